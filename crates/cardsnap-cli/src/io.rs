use cardsnap_core::RenderResult;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

pub(crate) fn write_output_with_tty(
    result: &RenderResult,
    output: Option<&Path>,
    stdout_is_tty: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(path) = output {
        std::fs::write(path, &result.bytes)?;
        if stdout_is_tty {
            print_wrote(path);
        }
        return Ok(());
    }

    if stdout_is_tty {
        let output_name = format!("cardsnap.{}", result.format.extension());
        std::fs::write(&output_name, &result.bytes)?;
        print_wrote(Path::new(&output_name));
        return Ok(());
    }

    let mut stdout = io::stdout();
    stdout.write_all(&result.bytes)?;
    stdout.flush()?;
    Ok(())
}

pub(crate) fn print_wrote(path: &Path) {
    println!("WROTE {}", path.display());
}
