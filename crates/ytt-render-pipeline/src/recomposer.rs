//! Map ytt's combined output back onto the output resources.
//!
//! ytt prints every rendered document to stdout separated by `---`. Fragment *i* of
//! that stream always lands in output resource *i*; there is no content matching.
//! Every fragment is checked and parsed before the first resource is touched, so a
//! failed recomposition leaves all output resources as they were.

use serde_yaml::Value;
use ytt_render_shared::resource::parse_value;
use ytt_render_shared::{ClassificationRules, ResourceDocument, ResultLog};

use crate::error::{PipelineError, PipelineResult};
use crate::invoker::EngineOutput;

/// Separator between documents in ytt's stdout.
pub const OUTPUT_SEPARATOR: &[u8] = b"---";

/// Split raw output on every occurrence of [`OUTPUT_SEPARATOR`].
///
/// The split is byte-level and not YAML-aware. Empty input is a single empty fragment,
/// and a separator at either end yields an empty fragment on that side.
pub fn split_fragments(output: &[u8]) -> Vec<&[u8]> {
    let mut fragments = Vec::new();
    let mut rest = output;

    while let Some(at) = rest
        .windows(OUTPUT_SEPARATOR.len())
        .position(|window| window == OUTPUT_SEPARATOR)
    {
        fragments.push(&rest[..at]);
        rest = &rest[at + OUTPUT_SEPARATOR.len()..];
    }
    fragments.push(rest);

    fragments
}

/// Write each fragment of `output` into the configured field of the matching output resource.
pub fn recompose(
    output: &EngineOutput,
    documents: &mut [&mut ResourceDocument],
    rules: &ClassificationRules,
    results: &mut ResultLog,
) -> PipelineResult<()> {
    if documents.is_empty() {
        let err = PipelineError::NoOutputDocuments {
            kind: rules.output_kind.clone(),
        };
        results.error(err.to_string());
        return Err(err);
    }

    let full_output = output.to_string_lossy();
    results.debug_detailed(
        "Processing ytt binary output",
        [("rawOutput", full_output.clone())],
    );

    let fragments = split_fragments(output.as_bytes());
    if fragments.len() > documents.len() {
        let err = PipelineError::CountMismatch {
            produced: fragments.len(),
            available: documents.len(),
        };
        results.error_detailed(
            "Ytt output had more files than available output files",
            [
                ("ytt_output_count", fragments.len().to_string()),
                ("output_file_count", documents.len().to_string()),
            ],
        );
        return Err(err);
    }
    if fragments.len() < documents.len() {
        results.warning_detailed(
            "Ytt output had more files provided than needed",
            [
                ("ytt_output_count", fragments.len().to_string()),
                ("output_file_count", documents.len().to_string()),
            ],
        );
    }

    let key = rules.output_key.as_str();
    let mut parsed: Vec<Value> = Vec::with_capacity(fragments.len());
    for (index, (fragment, document)) in fragments.iter().zip(documents.iter()).enumerate() {
        if !document.has_field(key) {
            let err = PipelineError::MissingField {
                path: document.display_path(),
                key: key.to_string(),
            };
            results.error(err.to_string());
            return Err(err);
        }

        let text = String::from_utf8_lossy(fragment);
        match parse_value(&text) {
            Ok(value) => parsed.push(value),
            Err(source) => {
                results.error_detailed(
                    "Failed to parse ytt output item",
                    [
                        ("item_index", index.to_string()),
                        ("output_dump", text.into_owned()),
                        ("full_output", full_output.clone()),
                        ("error", source.to_string()),
                    ],
                );
                return Err(PipelineError::Parse(source));
            }
        }
    }

    for (value, document) in parsed.into_iter().zip(documents.iter_mut()) {
        let path = document.display_path();
        if document.field_is_nil_or_empty(key) {
            results.info(format!("Writing to file: {path}, {key} key"));
        } else {
            results.info(format!("Overwriting file: {path}, {key} key"));
        }
        document.set_field(key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{document, output};
    use ytt_render_shared::Severity;

    fn run(
        engine_output: &str,
        documents: &mut [ResourceDocument],
    ) -> (PipelineResult<()>, ResultLog) {
        let mut results = ResultLog::new();
        let mut targets: Vec<&mut ResourceDocument> = documents.iter_mut().collect();
        let result = recompose(
            &EngineOutput::from(engine_output),
            &mut targets,
            &ClassificationRules::default(),
            &mut results,
        );
        (result, results)
    }

    fn data(document: &ResourceDocument) -> &Value {
        document.field("data").unwrap()
    }

    #[test]
    fn test_split_fragments() {
        assert_eq!(split_fragments(b""), [b"" as &[u8]]);
        assert_eq!(split_fragments(b"a: 1\n"), [b"a: 1\n" as &[u8]]);
        assert_eq!(
            split_fragments(b"a: 1\n---\nb: 2\n"),
            [b"a: 1\n" as &[u8], b"\nb: 2\n"]
        );
        assert_eq!(
            split_fragments(b"---\na: 1\n"),
            [b"" as &[u8], b"\na: 1\n"]
        );
        assert_eq!(split_fragments(b"a------b").len(), 3);
    }

    #[test]
    fn test_fragment_i_lands_in_document_i() {
        let mut docs = vec![
            output("first", "first.yaml", ""),
            output("second", "second.yaml", ""),
        ];
        let (result, _) = run("a: 1\n---\nb: 2\n", &mut docs);
        result.unwrap();

        assert_eq!(data(&docs[0]), &parse_value("a: 1").unwrap());
        assert_eq!(data(&docs[1]), &parse_value("b: 2").unwrap());
    }

    #[test]
    fn test_no_output_documents_fails_first() {
        let (result, results) = run("a: 1\n---\nb: 2\n", &mut []);
        let err = result.unwrap_err();
        assert!(matches!(err, PipelineError::NoOutputDocuments { .. }));
        assert_eq!(
            err.to_string(),
            "no output file with kind: Configuration provided"
        );
        assert_eq!(results.messages(Severity::Error).count(), 1);
    }

    #[test]
    fn test_over_production_mutates_nothing() {
        let mut docs = vec![output("only", "only.yaml", "keep: me")];
        let before = docs.clone();

        let (result, _) = run("a: 1\n---\nb: 2\n", &mut docs);
        assert!(matches!(
            result.unwrap_err(),
            PipelineError::CountMismatch {
                produced: 2,
                available: 1
            }
        ));
        assert_eq!(docs, before);
    }

    #[test]
    fn test_under_production_warns_and_leaves_tail() {
        let mut docs = vec![
            output("first", "first.yaml", ""),
            output("second", "second.yaml", "keep: me"),
        ];
        let (result, results) = run("a: 1\n", &mut docs);
        result.unwrap();

        assert_eq!(data(&docs[0]), &parse_value("a: 1").unwrap());
        assert_eq!(data(&docs[1]), &parse_value("keep: me").unwrap());
        assert_eq!(
            results.messages(Severity::Warning).collect::<Vec<_>>(),
            ["Ytt output had more files provided than needed"]
        );
    }

    #[test]
    fn test_missing_field_names_document_and_key() {
        let mut missing = document("kind: Configuration\nmetadata:\n  name: bare\n");
        missing.set_annotation("config.kubernetes.io/path", "bare.yaml");
        let mut docs = vec![output("first", "first.yaml", ""), missing];
        let before = docs.clone();

        let (result, _) = run("a: 1\n---\nb: 2\n", &mut docs);
        assert_eq!(
            result.unwrap_err().to_string(),
            "output file: bare.yaml, did not contain required output key: data"
        );
        assert_eq!(docs, before);
    }

    #[test]
    fn test_parse_failure_is_verbatim_and_atomic() {
        let mut docs = vec![
            output("first", "first.yaml", ""),
            output("second", "second.yaml", ""),
        ];
        let before = docs.clone();
        let mut results = ResultLog::new();

        let mut targets: Vec<&mut ResourceDocument> = docs.iter_mut().collect();
        let err = recompose(
            &EngineOutput::from("a: 1\n---\nkey: [unclosed\n"),
            &mut targets,
            &ClassificationRules::default(),
            &mut results,
        )
        .unwrap_err();

        let expected = parse_value("key: [unclosed\n").unwrap_err().to_string();
        assert_eq!(err.to_string(), expected);
        assert_eq!(docs, before);

        let logged = &results.items()[0];
        assert_eq!(logged.message, "Failed to parse ytt output item");
        assert_eq!(logged.tags["item_index"], "1");
        assert_eq!(logged.tags["full_output"], "a: 1\n---\nkey: [unclosed\n");
    }

    #[test]
    fn test_writing_vs_overwriting_messages() {
        let mut docs = vec![
            output("empty", "empty.yaml", ""),
            output("filled", "filled.yaml", "old: value"),
        ];
        let (result, results) = run("a: 1\n---\nb: 2\n", &mut docs);
        result.unwrap();

        assert_eq!(
            results.messages(Severity::Info).collect::<Vec<_>>(),
            [
                "Writing to file: empty.yaml, data key",
                "Overwriting file: filled.yaml, data key"
            ]
        );
    }

    #[test]
    fn test_custom_output_key() {
        let mut doc = document("kind: Configuration\nmetadata:\n  name: c\nrendered: {}\n");
        let rules = ClassificationRules::builder().output_key("rendered").build();
        let mut results = ResultLog::new();

        recompose(
            &EngineOutput::from("hello: world\n"),
            &mut [&mut doc],
            &rules,
            &mut results,
        )
        .unwrap();
        assert_eq!(
            doc.field("rendered").unwrap(),
            &parse_value("hello: world").unwrap()
        );
    }
}
