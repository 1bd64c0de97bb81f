use argsplus::{Flag, FlagSet, Integer, ParseError, Parser, Text, ValueConverter};
use proptest::prelude::*;

fn flags(short: char, long: &str) -> FlagSet {
    FlagSet::from_flags([Flag::Short(short), Flag::long(long)])
}

proptest! {
    #[test]
    fn absent_options_keep_their_default(
        default in any::<i64>(),
        words in prop::collection::vec("[a-z0-9][a-z0-9.]{0,8}", 0..4),
    ) {
        let mut parser = Parser::new();
        let n = parser
            .add_option("num", flags('n', "num"), Integer::<i64>::new())
            .default(default)
            .handle();
        for i in 0..words.len() {
            parser.add_positional(format!("word{i}"), Text);
        }

        parser.parse(&words).unwrap();
        prop_assert_eq!(parser[&n], default);
        prop_assert_eq!(parser.default_value(&n), Some(&default));
        prop_assert!(!parser.matched(&n));
    }

    #[test]
    fn long_joined_value_is_stored(name in "[a-z]{2,10}", value in any::<i64>()) {
        let mut parser = Parser::new();
        let n = parser
            .add_option("num", FlagSet::from_flags([Flag::long(name.clone())]), Integer::<i64>::new())
            .handle();

        parser.parse([format!("--{name}={value}")]).unwrap();
        prop_assert_eq!(parser[&n], value);
        prop_assert!(parser.matched(&n));
    }

    #[test]
    fn value_flag_in_cluster_takes_the_rest(rest in "\\PC{1,12}") {
        let mut parser = Parser::new();
        let a = parser.add_flag("a", flags('a', "alpha")).handle();
        let b = parser.add_option("b", flags('b', "beta"), Text).handle();

        parser.parse([format!("-ab{rest}")]).unwrap();
        prop_assert!(parser.matched(&a));
        prop_assert!(parser.matched(&b));
        prop_assert_eq!(&parser[&b], &rest);
    }

    #[test]
    fn tokens_after_terminator_are_positional(
        tokens in prop::collection::vec("-{0,2}[a-z]{0,4}", 1..6),
    ) {
        let mut parser = Parser::new();
        let flag = parser.add_flag("a", flags('a', "a")).handle();
        let slots: Vec<_> = (0..tokens.len())
            .map(|i| parser.add_positional(format!("p{i}"), Text).handle())
            .collect();

        let mut args = vec!["--".to_string()];
        args.extend(tokens.iter().cloned());
        parser.parse(&args).unwrap();

        prop_assert!(!parser.matched(&flag));
        for (slot, token) in slots.iter().zip(&tokens) {
            prop_assert_eq!(&parser[slot], token);
        }
    }

    #[test]
    fn parsing_is_deterministic(
        value in any::<u16>(),
        word in "[a-z]{1,8}",
        verbose in any::<bool>(),
    ) {
        let build = || {
            let mut parser = Parser::new();
            let v = parser.add_flag("verbose", flags('v', "verbose")).handle();
            let n = parser
                .add_option("num", flags('n', "num"), Integer::<u16>::new())
                .handle();
            let w = parser.add_positional("word", Text).handle();
            (parser, v, n, w)
        };

        let mut args = Vec::new();
        if verbose {
            args.push("-v".to_string());
        }
        args.push("-n".to_string());
        args.push(value.to_string());
        args.push(word.clone());

        let (mut first, v1, n1, w1) = build();
        let (mut second, v2, n2, w2) = build();
        first.parse(&args).unwrap();
        second.parse(&args).unwrap();

        prop_assert_eq!(first.matched(&v1), second.matched(&v2));
        prop_assert_eq!(first.matched(&v1), verbose);
        prop_assert_eq!(first[&n1], second[&n2]);
        prop_assert_eq!(&first[&w1], &second[&w2]);
    }

    #[test]
    fn integer_rejects_trailing_garbage(n in any::<i64>(), suffix in "[a-z ]{1,4}") {
        let raw = format!("{n}{suffix}");
        prop_assert!(Integer::<i64>::new().convert(&raw).is_err());
    }

    #[test]
    fn unregistered_long_flag_is_reported(name in "[a-z]{2,10}") {
        let mut parser = Parser::new();
        parser.add_flag("known", FlagSet::from_flags([Flag::long("zz-known")]));
        let err = parser.parse([format!("--{name}")]).unwrap_err();
        prop_assert_eq!(err, ParseError::UnmatchedFlag { flag: format!("--{name}") });
    }
}
