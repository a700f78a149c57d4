// system configuration and command line processing
//
// Grounded in the teacher's config.rs: the same clap::Command builder
// style (arg!/Command::new, not the derive API), generalized from a
// Forth interpreter's "load a core library then optionally run a file"
// surface to m4's "-D/-U predefine, then process files or stdin" surface.

use ::clap::{arg, Arg, ArgAction, Command};

use crate::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";

/// One `-D name` or `-D name=value` predefinition, in the order given on
/// the command line.
pub struct Predefine {
    pub name: String,
    pub value: Option<String>,
}

pub struct Config {
    pub debug_level: DebugLevel,
    pub files: Vec<String>,
    pub defines: Vec<Predefine>,
    pub undefines: Vec<String>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            debug_level: DebugLevel::Error,
            files: Vec::new(),
            defines: Vec::new(),
            undefines: Vec::new(),
        }
    }

    /// process_args handles command line argument processing using the
    /// clap library, matching `m4 [-Dname[=val]]... [-Uname]...
    /// [--debuglevel LEVEL] [file...]`.
    pub fn process_args(&mut self) -> &Config {
        let arguments = Command::new("m4")
            .version(VERSION)
            .author("m4rs contributors")
            .about("A macro processor")
            .arg(
                arg!(--debuglevel <VALUE>)
                    .required(false)
                    .value_parser(["error", "warning", "info", "debug"]),
            )
            .arg(
                Arg::new("define")
                    .short('D')
                    .long("define")
                    .value_name("NAME[=VALUE]")
                    .action(ArgAction::Append)
                    .required(false),
            )
            .arg(
                Arg::new("undefine")
                    .short('U')
                    .long("undefine")
                    .value_name("NAME")
                    .action(ArgAction::Append)
                    .required(false),
            )
            .arg(
                Arg::new("files")
                    .value_name("FILE")
                    .action(ArgAction::Append)
                    .required(false),
            )
            .get_matches();

        if let Some(debuglevel) = arguments.get_one::<String>("debuglevel") {
            match debuglevel.as_str() {
                "debug" => self.debug_level = DebugLevel::Debug,
                "info" => self.debug_level = DebugLevel::Info,
                "warning" => self.debug_level = DebugLevel::Warning,
                _ => self.debug_level = DebugLevel::Error,
            }
        }

        if let Some(defines) = arguments.get_many::<String>("define") {
            for d in defines {
                match d.split_once('=') {
                    Some((name, value)) => self.defines.push(Predefine {
                        name: name.to_owned(),
                        value: Some(value.to_owned()),
                    }),
                    None => self.defines.push(Predefine {
                        name: d.clone(),
                        value: None,
                    }),
                }
            }
        }

        if let Some(undefines) = arguments.get_many::<String>("undefine") {
            self.undefines.extend(undefines.cloned());
        }

        if let Some(files) = arguments.get_many::<String>("files") {
            self.files.extend(files.cloned());
        }

        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
