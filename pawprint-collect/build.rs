//! Build script for pawprint-collect

#[path = "../build-support/build_id.rs"]
mod build_id;

fn main() {
    build_id::emit();
}
