// tests/properties.rs

use std::path::Path;

use proptest::prelude::*;
use runkeeper::exec::output::output_file;
use runkeeper::server::protocol::{MAX_REQUEST_BYTES, Request, parse_request};

proptest! {
    // Whatever a client sends, the handler gets a verdict, never a panic,
    // and an accepted request always names a trimmed, non-empty program.
    #[test]
    fn parse_is_total_and_programs_are_trimmed(
        buf in proptest::collection::vec(any::<u8>(), 0..MAX_REQUEST_BYTES)
    ) {
        if let Ok(request) = parse_request(&buf) {
            let program = request.program();
            prop_assert!(!program.is_empty());
            prop_assert_eq!(program, program.trim());
        }
    }

    #[test]
    fn verbs_parse_regardless_of_case(
        verb in prop_oneof![Just("register"), Just("fetch"), Just("add"), Just("get")],
        upper in any::<bool>(),
        program in "[a-zA-Z0-9_./-]{1,64}",
    ) {
        let verb = if upper { verb.to_uppercase() } else { verb.to_string() };
        let parsed = parse_request(format!("{verb} {program}\n").as_bytes());
        let expected = match verb.to_lowercase().as_str() {
            "register" | "add" => Request::Register(program.clone()),
            _ => Request::Fetch(program.clone()),
        };
        prop_assert_eq!(parsed, Ok(expected));
    }

    // No identifier, however hostile, can place its record outside the
    // output root or more than one directory below it.
    #[test]
    fn output_records_stay_under_root(program in any::<String>()) {
        let root = Path::new("/srv/runkeeper/outputs");
        let record = output_file(root, &program);
        prop_assert!(record.starts_with(root));
        prop_assert_eq!(
            record.components().count(),
            root.components().count() + 2
        );
    }
}
