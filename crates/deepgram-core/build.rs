use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Without `fail_on_error` vergen emits placeholder values when rustc
    // cannot be queried; the user agent falls back to "unknown" then.
    EmitBuilder::builder().rustc_semver().emit()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
