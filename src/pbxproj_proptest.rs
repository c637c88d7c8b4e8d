//! Property-based tests for pbxproj string literals and phase parsing.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::pbxproj::{decode_quoted, encode_quoted, PbxProject};
    use proptest::prelude::*;

    const PHASE_NAME: &str = "Bundle React Native code and images";

    fn pbxproj_with_script(encoded_script: &str) -> String {
        format!(
            "// !$*UTF8*$!\n{{\n\tobjects = {{\n\t\t00DD1BFF1BD5951E006B06BC /* Bundle */ = {{\n\t\t\tisa = PBXShellScriptBuildPhase;\n\t\t\tname = \"{PHASE_NAME}\";\n\t\t\tshellPath = /bin/sh;\n\t\t\tshellScript = {encoded_script};\n\t\t}};\n\t}};\n}}\n"
        )
    }

    // ============================================================================
    // quoted literal property tests
    // ============================================================================

    proptest! {
        /// Property: decoding an encoded value returns the original value
        #[test]
        fn quoted_literal_roundtrips(value in any::<String>()) {
            let literal = encode_quoted(&value);
            let decoded = decode_quoted(&literal).unwrap();
            prop_assert_eq!(decoded, value);
        }

        /// Property: encoded literals are fully quoted and single-line
        #[test]
        fn encoded_literal_is_single_line(value in any::<String>()) {
            let literal = encode_quoted(&value);
            prop_assert!(literal.starts_with('"'));
            prop_assert!(literal.ends_with('"'));
            prop_assert!(literal.len() >= 2);
            prop_assert!(
                !literal.contains('\n'),
                "encoded literal contains a raw newline: {:?}",
                literal
            );
        }

        /// Property: encoding is deterministic (same input = same output)
        #[test]
        fn encoding_is_deterministic(value in ".*") {
            prop_assert_eq!(encode_quoted(&value), encode_quoted(&value));
        }

        /// Property: decode rejects input that does not start with a quote
        #[test]
        fn decode_rejects_unquoted_input(value in "[^\"].*") {
            prop_assert!(decode_quoted(&value).is_err());
        }
    }

    // ============================================================================
    // phase parsing property tests
    // ============================================================================

    proptest! {
        /// Property: parsing a project yields the exact script that was encoded,
        /// whatever the script contains (braces, comment markers, quotes)
        #[test]
        fn parse_preserves_arbitrary_scripts(script in any::<String>()) {
            let text = pbxproj_with_script(&encode_quoted(&script));
            let project = PbxProject::parse(text).unwrap();
            let phase = project.phase_named(PHASE_NAME).unwrap();
            prop_assert_eq!(phase.shell_script.as_deref(), Some(script.as_str()));
        }

        /// Property: replacing a phase script and re-reading yields the replacement
        #[test]
        fn set_shell_script_roundtrips(
            initial in any::<String>(),
            replacement in any::<String>(),
        ) {
            let text = pbxproj_with_script(&encode_quoted(&initial));
            let mut project = PbxProject::parse(text).unwrap();
            let id = project.phase_named(PHASE_NAME).unwrap().id.clone();

            project.set_shell_script(&id, &replacement).unwrap();

            let phase = project.phase_named(PHASE_NAME).unwrap();
            prop_assert_eq!(phase.shell_script.as_deref(), Some(replacement.as_str()));
        }
    }
}
