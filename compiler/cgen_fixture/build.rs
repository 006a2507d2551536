//! Build script for cgen_fixture.
//!
//! Compiles `schema/config.yaml` into `$OUT_DIR/config.rs` and its key
//! reference into `$OUT_DIR/config.md`. Schema errors fail the build with
//! their rendered diagnostics.

use std::error::Error;
use std::path::PathBuf;

use cgen_codegen::CodegenOptions;

fn main() -> Result<(), Box<dyn Error>> {
    let schema = PathBuf::from("schema/config.yaml");
    println!("cargo:rerun-if-changed={}", schema.display());

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let options = CodegenOptions::default();
    let text = std::fs::read_to_string(&schema)?;

    let code = match cgenc::compile_str(&text, &options) {
        Ok(code) => code,
        Err(err) => {
            for diag in err.diagnostics() {
                println!("cargo:warning={}", diag.to_string().replace('\n', " "));
            }
            return Err(err.into());
        }
    };
    std::fs::write(out_dir.join("config.rs"), code)?;
    std::fs::write(out_dir.join("config.md"), cgenc::reference_str(&text, &options)?)?;
    Ok(())
}
