//! Batch conversion — independent file conversions run concurrently on scoped threads.

use std::path::{Path, PathBuf};
use std::thread;

use super::Converter;
use crate::error::ConvertError;
use crate::render::AudioFormat;

/// One input file and where its audio goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: AudioFormat,
    pub waveform: String,
}

impl ConversionJob {
    /// Job writing `<out_dir>/<input stem>.<ext>`.
    pub fn in_dir(
        input: PathBuf,
        out_dir: &Path,
        format: AudioFormat,
        waveform: &str,
    ) -> Self {
        let mut name = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "out".into());
        name.push(".");
        name.push(format.extension());
        let output = out_dir.join(name);
        Self {
            input,
            output,
            format,
            waveform: waveform.to_string(),
        }
    }
}

impl Converter {
    /// Run each job to completion or failure, at most one job per available core at a time.
    ///
    /// Results come back in job order.
    pub fn convert_batch(&self, jobs: &[ConversionJob]) -> Vec<Result<PathBuf, ConvertError>> {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let mut results = Vec::with_capacity(jobs.len());

        for chunk in jobs.chunks(workers) {
            thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|job| {
                        scope.spawn(move || {
                            self.convert_file(&job.input, &job.output, job.format, &job.waveform)
                        })
                    })
                    .collect();
                for handle in handles {
                    match handle.join() {
                        Ok(result) => results.push(result),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_uses_input_stem() {
        let job = ConversionJob::in_dir(
            PathBuf::from("songs/melody.mid"),
            Path::new("out"),
            AudioFormat::Aiff,
            "saw",
        );
        assert_eq!(job.output, PathBuf::from("out/melody.aiff"));
        assert_eq!(job.waveform, "saw");
    }

    #[test]
    fn in_dir_keeps_dotted_stems() {
        let job = ConversionJob::in_dir(
            PathBuf::from("take.2.mid"),
            Path::new("."),
            AudioFormat::Wav,
            "sine",
        );
        assert_eq!(job.output, PathBuf::from("./take.2.wav"));
    }
}
