//! Run the ytt binary over staged files.
//!
//! The command line is one flag/path pair per staged file, in staging order:
//! `-f <path>` for templates, `--data-values-file <path>` for data values.
//! Nothing is written to ytt's stdin; stdout is captured unmodified.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use ytt_render_shared::{EngineSettings, ResultLog};

use crate::classifier::Role;
use crate::error::{PipelineError, PipelineResult};
use crate::stager::StagedFile;

/// Prefix of every engine failure message.
pub const ENGINE_DRIVER: &str = "ytt";

const TEMPLATE_FLAG: &str = "-f";
const VALUES_FLAG: &str = "--data-values-file";

/// Raw stdout of a successful ytt run.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::From)]
pub struct EngineOutput(Vec<u8>);

impl EngineOutput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for EngineOutput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Build ytt's argument list for the staged files.
pub fn engine_args(files: &[StagedFile]) -> Vec<OsString> {
    files
        .iter()
        .flat_map(|file| {
            let flag = match file.role {
                Role::Values => VALUES_FLAG,
                Role::Template | Role::Output => TEMPLATE_FLAG,
            };
            [OsString::from(flag), file.path.clone().into_os_string()]
        })
        .collect()
}

/// Execute ytt and wait for it to exit.
///
/// A process that cannot be started, or that exits unsuccessfully, is reported as
/// [`PipelineError::Engine`] carrying ytt's stderr verbatim.
pub fn invoke(
    files: &[StagedFile],
    engine: &EngineSettings,
    results: &mut ResultLog,
) -> PipelineResult<EngineOutput> {
    let work_dir = engine
        .resolve_work_dir()
        .map_err(|source| engine_error(source.to_string(), String::new(), results))?;
    let args = engine_args(files);

    results.debug_detailed(
        "Executing ytt binary",
        [
            ("bin_name", engine.bin_name.clone()),
            ("work_dir", work_dir.display().to_string()),
            (
                "args",
                args.iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        ],
    );

    let output = Command::new(&engine.bin_name)
        .args(&args)
        .current_dir(&work_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| engine_error(source.to_string(), String::new(), results))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        return Err(engine_error(output.status.to_string(), stderr, results));
    }

    Ok(EngineOutput(output.stdout))
}

fn engine_error(reason: String, stderr: String, results: &mut ResultLog) -> PipelineError {
    results.error_detailed(
        "Failed to run ytt binary",
        [("reason", reason.clone()), ("stderr", stderr.clone())],
    );
    PipelineError::Engine {
        driver: ENGINE_DRIVER,
        reason,
        stderr,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::fake_engine;
    use serial_test::serial;
    use std::path::PathBuf;
    use ytt_render_shared::Severity;

    fn staged(role: Role, path: &str) -> StagedFile {
        StagedFile {
            role,
            path: PathBuf::from(path),
        }
    }

    fn settings(bin: &std::path::Path) -> EngineSettings {
        EngineSettings::builder()
            .bin_name(bin.display().to_string())
            .build()
    }

    #[test]
    fn test_engine_args_follow_staging_order() {
        let files = [
            staged(Role::Template, "/s/a.yaml"),
            staged(Role::Values, "/s/v.yaml"),
            staged(Role::Template, "/s/b.yaml"),
        ];
        let args: Vec<_> = engine_args(&files)
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();
        assert_eq!(
            args,
            [
                "-f",
                "/s/a.yaml",
                "--data-values-file",
                "/s/v.yaml",
                "-f",
                "/s/b.yaml"
            ]
        );
    }

    #[test]
    fn test_engine_args_empty() {
        assert!(engine_args(&[]).is_empty());
    }

    #[test]
    #[serial]
    fn test_invoke_passes_args_and_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_engine(dir.path(), r#"echo "$@""#);
        let files = [
            staged(Role::Template, "t.yaml"),
            staged(Role::Values, "v.yaml"),
        ];

        let output = invoke(&files, &settings(&bin), &mut ResultLog::new()).unwrap();
        assert_eq!(
            output.to_string_lossy(),
            "-f t.yaml --data-values-file v.yaml\n"
        );
    }

    #[test]
    #[serial]
    fn test_invoke_runs_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_engine(dir.path(), "pwd");
        let work = tempfile::tempdir().unwrap();
        let engine = EngineSettings::builder()
            .bin_name(bin.display().to_string())
            .work_dir(work.path().display().to_string())
            .build();

        let output = invoke(&[], &engine, &mut ResultLog::new()).unwrap();
        let reported = PathBuf::from(output.to_string_lossy().trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            work.path().canonicalize().unwrap()
        );
    }

    #[test]
    #[serial]
    fn test_invoke_output_is_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_engine(dir.path(), r#"printf 'a: 1\n---\nb: 2'"#);

        let output = invoke(&[], &settings(&bin), &mut ResultLog::new()).unwrap();
        assert_eq!(output.as_bytes(), b"a: 1\n---\nb: 2");
    }

    #[test]
    #[serial]
    fn test_invoke_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_engine(dir.path(), "echo boom >&2\nexit 1");
        let mut results = ResultLog::new();

        let err = invoke(&[], &settings(&bin), &mut results).unwrap_err();
        assert!(matches!(err, PipelineError::Engine { ref stderr, .. } if stderr == "boom\n"));
        assert_eq!(err.to_string(), "ytt: exit status: 1 (stderr: boom\n)");
        assert_eq!(results.messages(Severity::Error).count(), 1);
    }

    #[test]
    #[serial]
    fn test_invoke_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EngineSettings::builder()
            .bin_name(dir.path().join("no-such-ytt").display().to_string())
            .build();

        let err = invoke(&[], &engine, &mut ResultLog::new()).unwrap_err();
        assert!(matches!(err, PipelineError::Engine { .. }));
        assert!(err.to_string().starts_with("ytt: "));
    }

    #[test]
    #[serial]
    fn test_invoke_logs_command_at_debug() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_engine(dir.path(), "true");
        let mut results = ResultLog::with_level(Severity::Debug);

        invoke(&[staged(Role::Template, "t.yaml")], &settings(&bin), &mut results).unwrap();
        let item = &results.items()[0];
        assert_eq!(item.message, "Executing ytt binary");
        assert_eq!(item.tags["args"], "-f t.yaml");
    }
}
