use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    let args = std::env::args().collect::<Vec<_>>();
    let arg0 = args.first().map_or("hatch", String::as_str);

    let mut twentythree = 0;
    let mut eight = Vec::new();
    let mut four = String::new();
    let mut hatch = false;

    let mut parser = flagbind::Parser::new().with_help(arg0, "POSITIONAL [FLAGS]");
    parser.int("twentythree", &mut twentythree, "Shephard").default(23).alias(["23"]);
    parser.int_repeated("eight", &mut eight, "Reyes").default(vec![8]).alias(["8"]);
    parser.string("four", &mut four, "Locke").default("4".to_string()).alias(["4"]);
    parser.bool("hatch", &mut hatch, "The hatch");

    let tokens = if args.len() > 1 {
        args[1..].to_vec()
    } else {
        "4 -8 15 16 --23 42 --hatch 3".split(' ').map(String::from).collect()
    };

    match parser.parse(tokens) {
        Ok(()) => {}
        Err(err) if err.is_help() => {
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1)
        }
    }

    let positional = parser.positional().to_vec();
    drop(parser);

    println!(":23 {twentythree}");
    println!(":8 {eight:?}");
    println!(":4 {four}");
    println!(":hatch {hatch}");
    println!(":positional {positional:?}");
}
