//! Command implementation.

use std::io::{self, Write};

use ffibind::{Backend, GeneratedFile, Generator, load_descriptor};
use tracing::{error, info};

use crate::cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};

/// Generate bindings for every selected back-end.
pub fn run_command(cli: &Cli) -> i32 {
    let module = match load_descriptor(&cli.input) {
        Ok(module) => module,
        Err(err) => {
            error!(error = %err, "failed to load descriptor");
            return EXIT_FAILURE;
        }
    };

    let backends = cli.backends();
    let backends: Vec<&dyn Backend> = backends.iter().map(AsRef::as_ref).collect();
    let generator = Generator::new(cli.emit_config());

    let mut exit_code = EXIT_SUCCESS;
    let results = generator.generate_all(&module, &backends);
    for (backend, result) in backends.iter().zip(results) {
        let written = result.and_then(|file| {
            if cli.stdout {
                print_file(&file)?;
            } else {
                let path = file.write_to(&cli.output)?;
                info!(backend = backend.name(), output = %path.display(), "done");
            }
            Ok(())
        });
        if let Err(err) = written {
            error!(backend = backend.name(), error = %err, "generation failed");
            exit_code = EXIT_FAILURE;
        }
    }
    exit_code
}

fn print_file(file: &GeneratedFile) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(file.source().as_bytes())?;
    stdout.flush()
}
