//! Build script for embedded assets.
//!
//! `sqlx::migrate!` and rust-embed both read directories at compile time.
//! Neither one tells cargo to rebuild when a file is added, so this script
//! does it for them.

fn main() {
    println!("cargo:rerun-if-changed=data/sql/sqlite");
    println!("cargo:rerun-if-changed=static");
}
