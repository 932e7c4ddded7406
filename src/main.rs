use pipesh::config::Options;
use pipesh::{Environment, Interpreter, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let options: Options = argh::from_env();

    if let Some(path) = &options.log_file {
        if let Err(e) = logging::init(path, options.log_level) {
            eprintln!("pipesh: {}", e);
        }
    }

    let mut interpreter = Interpreter::new(Environment::new());
    interpreter.load_history(options.history_path());

    let result = match &options.command {
        Some(line) => {
            interpreter.run_line(line);
            Ok(())
        }
        None => interpreter.repl(&options.prompt),
    };
    interpreter.save_history();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pipesh: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
