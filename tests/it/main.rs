
use std::{fmt, path::PathBuf};

use expect_test::{expect, Expect};
use flagbind::{Error, Parsed, Parser};

fn check<F, A>(f: F, args: &str, expect: Expect)
where
    F: FnOnce(Vec<String>) -> flagbind::Result<A>,
    A: fmt::Debug,
{
    let args = args.split_ascii_whitespace().map(String::from).collect::<Vec<_>>();
    let res = f(args);
    match res {
        Ok(args) => {
            expect.assert_debug_eq(&args);
        }
        Err(err) => {
            expect.assert_eq(&err.to_string());
        }
    }
}

#[test]
fn lost() {
    check(
        lost::Lost::from_vec,
        "4 -8 15 16 --23 42 --hatch 3",
        expect![[r#"
            Lost {
                twentythree: 42,
                eight: [
                    15,
                    16,
                ],
                four: "4",
                hatch: true,
                positional: [
                    "4",
                    "3",
                ],
            }
        "#]],
    );
    check(
        lost::Lost::from_vec,
        "",
        expect![[r#"
            Lost {
                twentythree: 23,
                eight: [
                    8,
                ],
                four: "4",
                hatch: false,
                positional: [],
            }
        "#]],
    );
    check(
        lost::Lost::from_vec,
        "--four -4 -4 16",
        expect![[r#"
            Lost {
                twentythree: 23,
                eight: [
                    8,
                ],
                four: "16",
                hatch: false,
                positional: [],
            }
        "#]],
    );
}

#[test]
fn help() {
    check(
        lost::Lost::from_vec,
        "-8 15 -h",
        expect![[r#"
            Usage: lost POSITIONAL [FLAGS]

            Flags:
              --help, -h           Print this help page
              --twentythree, --23  Shephard
              --eight, -8          Reyes
              --four, -4           Locke
              --hatch              The hatch
        "#]],
    );
    check(
        kinds::Kinds::from_vec,
        "--help",
        expect![[r#"
            Usage: kinds [options]

            Flags:
              --help, -h    Print this help page
              --int, -i     An integer
              --string, -s  A string
              --ints        Integers
              --strings     Strings
              --switch, -w  A switch
        "#]],
    );
}

#[test]
fn help_without_banner() {
    let (mut int, mut string, mut switch) = (0, String::new(), false);
    let mut parser = Parser::new();
    assert_eq!(parser.help(), "Usage: \n\nFlags:\n");

    parser.int("intflag", &mut int, "integer flag");
    parser.string("strflag", &mut string, "string flag");
    parser.bool("boolflag", &mut switch, "boolean flag").alias(["b", "bool"]);
    assert_eq!(
        parser.help(),
        "Usage: \n\nFlags:\n  --intflag               integer flag\n  --strflag               string flag\n  --boolflag, -b, --bool  boolean flag\n"
    );
}

#[test]
fn help_request_skips_defaults() {
    let mut n = 0;
    let mut parser = Parser::new().with_help("prog", "");
    parser.int("n", &mut n, "").default(3);
    let err = parser.parse(["-h"]).unwrap_err();
    assert!(err.is_help());
    assert!(parser.parse(["-n", "1"]).is_ok());
    drop(parser);
    assert_eq!(n, 1);
}

#[test]
fn kinds() {
    check(
        kinds::Kinds::from_vec,
        "a -i 1 b --string x c --ints 1 2 3 --strings d -w e",
        expect![[r#"
            Kinds {
                int: 1,
                string: "x",
                ints: [
                    1,
                    2,
                    3,
                ],
                strings: [
                    "d",
                ],
                switch: true,
                positional: [
                    "a",
                    "b",
                    "c",
                    "e",
                ],
            }
        "#]],
    );
    check(
        kinds::Kinds::from_vec,
        "--ints 1 --int 2 --ints 3 -i 4 5",
        expect![[r#"
            Kinds {
                int: 4,
                string: "",
                ints: [
                    1,
                    3,
                ],
                strings: [],
                switch: false,
                positional: [
                    "5",
                ],
            }
        "#]],
    );
    check(
        kinds::Kinds::from_vec,
        "--strings a --switch b",
        expect![[r#"
            Kinds {
                int: 0,
                string: "",
                ints: [],
                strings: [
                    "a",
                ],
                switch: true,
                positional: [
                    "b",
                ],
            }
        "#]],
    );
    check(
        kinds::Kinds::from_vec,
        "--int --string 1 2",
        expect![[r#"
            Kinds {
                int: 0,
                string: "1",
                ints: [],
                strings: [],
                switch: false,
                positional: [
                    "2",
                ],
            }
        "#]],
    );
}

#[test]
fn parse_errors() {
    check(kinds::Kinds::from_vec, "-a", expect!["unknown flag: -a"]);
    check(kinds::Kinds::from_vec, "-", expect!["unknown flag: -"]);
    check(kinds::Kinds::from_vec, "--", expect!["unknown flag: --"]);
    check(kinds::Kinds::from_vec, "--i 1", expect!["unknown flag: --i"]);
    check(kinds::Kinds::from_vec, "-int 1", expect!["unknown flag: -int"]);
    check(
        kinds::Kinds::from_vec,
        "--int",
        expect!["flag --int requires a value but none was provided"],
    );
    check(
        kinds::Kinds::from_vec,
        "a --ints 1 --strings",
        expect!["flag --strings requires a value but none was provided"],
    );
    check(
        kinds::Kinds::from_vec,
        "--int abc",
        expect!["when consuming int (i64 singleton): invalid digit found in string"],
    );
    check(
        kinds::Kinds::from_vec,
        "--ints 1 99999999999999999999",
        expect!["when consuming ints (slice of i64): number too large to fit in target type"],
    );
}

#[test]
fn trailing_switch_needs_no_value() {
    check(
        kinds::Kinds::from_vec,
        "-w",
        expect![[r#"
            Kinds {
                int: 0,
                string: "",
                ints: [],
                strings: [],
                switch: true,
                positional: [],
            }
        "#]],
    );
}

#[test]
fn definition_errors_are_reported_together() {
    let (mut a, mut b, mut c, mut ok) = (0, 0, 0, 0);
    let mut parser = Parser::new();
    parser.int("flag", &mut a, "first");
    parser.int("flag", &mut b, "second");
    parser.int("", &mut c, "nameless");
    parser.int("ok", &mut ok, "").default(7);

    let err = parser.parse(["--ok", "1"]).unwrap_err();
    assert!(matches!(&err, Error::Definition(errors) if errors.len() == 2));
    expect![[r#"
        2 flag definition errors, refusing to parse
        flag --flag already exists
        i64 singleton (names: [""]) has an empty name"#]]
    .assert_eq(&err.to_string());

    // Every later call fails the same way, whatever the tokens.
    assert!(matches!(parser.parse(Vec::<String>::new()), Err(Error::Definition(_))));
    drop(parser);
    assert_eq!(ok, 0);
}

#[test]
fn alias_collisions() {
    let (mut a, mut b, mut c) = (0, 0, false);
    let mut parser = Parser::new();
    parser.int("first", &mut a, "").alias(["f", "second"]);
    parser.int("second", &mut b, "").alias(["f"]);
    parser.bool("third", &mut c, "").alias(["t", "t"]);

    let err = parser.parse(["-t"]).unwrap_err();
    expect![[r#"
        3 flag errors after aliases expansion, refusing to parse
        flag --second already exists
        flag -f already exists
        flag -t already exists"#]]
    .assert_eq(&err.to_string());
    drop(parser);
    assert!(!c);
}

#[test]
fn aliases_resolve_to_the_same_destination() {
    let mut n = 0;
    let mut parser = Parser::new();
    parser.int("flag", &mut n, "").alias(["f", "fl"]);
    parser.parse(["-f", "1"]).unwrap();
    parser.parse(["--fl", "2"]).unwrap();
    parser.parse(["--flag", "3", "-f", "4"]).unwrap();
    drop(parser);
    assert_eq!(n, 4);
}

#[test]
fn defaults() {
    let (mut int, mut string, mut ints, mut switch) = (42, "foo".to_string(), vec![9], true);
    let mut untouched = 5;
    let mut parser = Parser::new();
    parser.int("int", &mut int, "").default(23);
    parser.string("string", &mut string, "").default("bar".to_string());
    parser.int_repeated("ints", &mut ints, "").default(vec![1, 2, 3]);
    parser.bool("switch", &mut switch, "").default(false);
    parser.int("untouched", &mut untouched, "");
    parser.parse(Vec::<String>::new()).unwrap();
    drop(parser);

    assert_eq!(int, 23);
    assert_eq!(string, "bar");
    assert_eq!(ints, [1, 2, 3]);
    assert!(!switch);
    assert_eq!(untouched, 5);
}

#[test]
fn explicit_value_beats_default() {
    let mut n = 0;
    let mut parser = Parser::new();
    parser.int("name", &mut n, "").default(23);
    parser.parse(["--name", "5"]).unwrap();
    drop(parser);
    assert_eq!(n, 5);
}

#[test]
fn failed_parse_keeps_earlier_values() {
    let (mut a, mut b, mut c) = (0, 0, 0);
    let mut parser = Parser::new();
    parser.int("a", &mut a, "");
    parser.int("b", &mut b, "");
    parser.int("c", &mut c, "").default(9);
    assert!(parser.parse(["-a", "1", "-b", "x", "-c", "2"]).is_err());
    assert!(parser.parse(["-a", "2", "--nope", "-b", "3"]).is_err());
    drop(parser);
    assert_eq!((a, b, c), (2, 0, 0));
}

#[test]
fn repeated_flags_accumulate_across_parses() {
    let (mut values, mut n) = (Vec::new(), 0);
    let mut parser = Parser::new();
    parser.int_repeated("value", &mut values, "").alias(["v"]).default(vec![0]);
    parser.int("n", &mut n, "").default(1);

    parser.parse(["-v", "1", "-n", "5", "x"]).unwrap();
    assert_eq!(parser.positional(), ["x"]);
    parser.parse(["-v", "2", "3"]).unwrap();
    assert!(parser.positional().is_empty());
    drop(parser);

    assert_eq!(values, [1, 2, 3]);
    assert_eq!(n, 1);
}

#[test]
fn repeated_default_does_not_erase_earlier_parses() {
    let mut values = Vec::new();
    let mut parser = Parser::new();
    parser.int_repeated("v", &mut values, "").default(vec![8]);

    parser.parse(["-v", "1"]).unwrap();
    parser.parse(Vec::<String>::new()).unwrap();
    parser.parse(["x"]).unwrap();
    drop(parser);

    assert_eq!(values, [1]);
}

#[test]
fn custom_decoders() {
    let mut out = PathBuf::new();
    let mut ratios = Vec::new();
    let mut parser = Parser::new();
    parser.register::<Parsed<PathBuf>>("out", &mut out, "Output file").alias(["o"]);
    parser.register_repeated::<Parsed<f64>>("ratio", &mut ratios, "Ratios");

    let kinds = parser.flags().map(|flag| flag.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, ["PathBuf singleton", "slice of f64"]);

    let err = parser.parse(["--ratio", "half"]).unwrap_err();
    assert_eq!(err.to_string(), "when consuming ratio (slice of f64): invalid float literal");
    assert!(std::error::Error::source(&err).is_some());

    parser.parse(["-o", "/tmp/out", "--ratio", "0.5", "1e3"]).unwrap();
    drop(parser);
    assert_eq!(out, PathBuf::from("/tmp/out"));
    assert_eq!(ratios, [0.5, 1000.0]);
}

#[test]
fn flags_are_listed_in_registration_order() {
    let (mut a, mut b) = (0, false);
    let mut parser = Parser::new().with_help("prog", "ARGS");
    parser.bool("zeta", &mut b, "Last letter").alias(["z"]);
    parser.int("alpha", &mut a, "First letter").alias(["a", "first"]);

    let flags = parser
        .flags()
        .map(|flag| format!("{:?} {} / {}", flag.names(), flag.doc(), flag.kind()))
        .collect::<Vec<_>>();
    expect![[r#"
        [
            "[\"help\", \"h\"] Print this help page / bool singleton",
            "[\"zeta\", \"z\"] Last letter / bool singleton",
            "[\"alpha\", \"a\", \"first\"] First letter / i64 singleton",
        ]
    "#]]
    .assert_debug_eq(&flags);
    assert_eq!(parser.usage(), "prog ARGS");
}

#[test]
fn help_registered_twice() {
    let mut parser = Parser::new().with_help("prog", "").with_help("prog", "");
    expect![[r#"
        1 flag definition errors, refusing to parse
        flag --help already exists"#]]
    .assert_eq(&parser.parse(["-h"]).unwrap_err().to_string());
}
