use std::error::Error;

// Exposes VERGEN_GIT_SHA for `--version`.
fn main() -> Result<(), Box<dyn Error>> {
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .build()?,
        )?
        .emit()?;
    Ok(())
}
