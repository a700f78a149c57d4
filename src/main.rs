// m4rs main program

#[cfg(test)]
mod acceptance_tests;
mod callstack;
mod config;
mod diversion;
mod engine;
mod error;
mod internals;
mod messages;
mod pushback;
mod symtab;
mod token;

use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use engine::Engine;
use messages::Msg;

fn main() -> ExitCode {
    let mut config = Config::new();
    config.process_args();

    let mut msg = Msg::new();
    msg.set_level(config.debug_level);

    let stdin_enabled = config.files.is_empty();
    let mut engine = Engine::new(stdin_enabled);

    for undefine in &config.undefines {
        engine.undefine_from_cli(undefine.as_bytes());
    }
    for define in &config.defines {
        engine.define_from_cli(define.name.as_bytes(), define.value.as_deref().map(str::as_bytes));
    }

    // Files are loaded as one concatenated pushback so rescanning works
    // uniformly across file boundaries; they must be prepended in
    // reverse so the first file ends up on top of the LIFO stack and is
    // therefore read first.
    for path in config.files.iter().rev() {
        if let Err(e) = engine.pushback.prepend_file(&PathBuf::from(path)) {
            msg.error("main", "unable to load input file", Some(e));
            return ExitCode::FAILURE;
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match engine.run(&mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            msg.error("main", "fatal", Some(e));
            ExitCode::FAILURE
        }
    }
}
