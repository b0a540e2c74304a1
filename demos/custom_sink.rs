//! Routing fallback diagnostics to a custom sink

use envparse::{Diagnostics, Reader};
use std::cell::Cell;
use std::fmt::{Debug, Display};

/// Counts fallbacks and prints them to stderr
#[derive(Default)]
struct CountingSink {
    fallbacks: Cell<usize>,
}

impl Diagnostics for CountingSink {
    fn using_default(&self, name: &str, default: &dyn Debug, cause: Option<&dyn Display>) {
        self.fallbacks.set(self.fallbacks.get() + 1);
        match cause {
            Some(cause) => eprintln!("{name}: invalid value ({cause}), using {default:?}"),
            None => eprintln!("{name}: not set, using {default:?}"),
        }
    }

    fn default_invalid(&self, name: &str, default: &dyn Debug) {
        eprintln!("{name}: no default given, using {default:?}");
    }
}

#[derive(Debug)]
struct Settings {
    workers: i64,
    port: u16,
    verbose: bool,
    tags: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("WORKERS", "four");
    std::env::set_var("TAGS", "blue|green");
    std::env::remove_var("PORT");
    std::env::remove_var("VERBOSE");

    let sink = CountingSink::default();
    let reader = Reader::new(&sink);

    let settings = Settings {
        workers: reader.lookup("WORKERS").def(4).as_int(),
        port: reader.lookup("PORT").def(8080).as_parsed(),
        verbose: reader.lookup("VERBOSE").def(false).as_bool(),
        tags: reader.lookup("TAGS").def(Vec::<String>::new()).as_str_list_by("|"),
    };

    println!("{settings:#?}");
    println!("{} setting(s) fell back to defaults", sink.fallbacks.get());

    anyhow::ensure!(settings.port == 8080, "unexpected port {}", settings.port);
    Ok(())
}
