//! Episode and optimization-step metrics recording.

use super::MetricLogger;
#[cfg(feature = "tensorboard")]
use super::TensorBoardLogger;
use crate::{OcenvError, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Caller-owned state for one training run: destination directory, start
/// instant and episode counter.
///
/// Each [`Recorder`] owns exactly one run context, so multiple recorders
/// can coexist in a process without interfering.
#[derive(Debug)]
pub struct RunContext {
    log_dir: PathBuf,
    started: Instant,
    episodes: u64,
}

impl RunContext {
    fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            started: Instant::now(),
            episodes: 0,
        }
    }

    /// Destination directory for run artifacts.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Episodes recorded so far.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Wall-clock hours since the run started.
    pub fn elapsed_hours(&self) -> f64 {
        self.started.elapsed().as_secs_f64() / 3600.0
    }
}

/// Summary of one finished episode.
#[derive(Clone, Debug, Default)]
pub struct EpisodeSummary {
    /// Total environment steps across the whole run
    pub total_steps: u64,
    /// Episode reward
    pub reward: f64,
    /// Per-option sequences of activation lengths
    pub option_lengths: HashMap<usize, Vec<u32>>,
    /// Steps in this episode
    pub episode_steps: u64,
    /// Current exploration rate
    pub epsilon: f64,
}

impl EpisodeSummary {
    /// Create a summary without option statistics.
    pub fn new(total_steps: u64, reward: f64, episode_steps: u64, epsilon: f64) -> Self {
        Self {
            total_steps,
            reward,
            option_lengths: HashMap::new(),
            episode_steps,
            epsilon,
        }
    }

    /// Attach per-option activation lengths.
    pub fn with_option_lengths(mut self, option_lengths: HashMap<usize, Vec<u32>>) -> Self {
        self.option_lengths = option_lengths;
        self
    }
}

/// Scalar values for one optimization step.
#[derive(Clone, Debug, Default)]
pub struct StepRecord {
    /// Optimization step index
    pub step: u64,
    /// Actor loss, if computed this step
    pub actor_loss: Option<f64>,
    /// Critic loss, if computed this step
    pub critic_loss: Option<f64>,
    /// Policy entropy
    pub entropy: f64,
    /// Current exploration rate
    pub epsilon: f64,
}

impl StepRecord {
    /// Create a record without losses.
    pub fn new(step: u64, entropy: f64, epsilon: f64) -> Self {
        Self {
            step,
            actor_loss: None,
            critic_loss: None,
            entropy,
            epsilon,
        }
    }

    /// Set the actor loss.
    pub fn with_actor_loss(mut self, loss: f64) -> Self {
        self.actor_loss = Some(loss);
        self
    }

    /// Set the critic loss.
    pub fn with_critic_loss(mut self, loss: f64) -> Self {
        self.critic_loss = Some(loss);
        self
    }
}

/// Records training metrics to a structured text log and a scalar sink.
///
/// One human-readable line per episode goes to tracing and to
/// `<log_dir>/logger.log`; scalar time series go to the sink (TensorBoard
/// by default). Designed for single-threaded synchronous use from a
/// training loop; failures propagate immediately.
pub struct Recorder {
    run: RunContext,
    log_file: BufWriter<File>,
    scalars: Box<dyn MetricLogger>,
}

impl Recorder {
    /// Open a recorder writing scalars to a TensorBoard sink rooted at
    /// `log_dir`.
    ///
    /// Creates the directory if absent. Directory-creation or sink-open
    /// failure is fatal to the run.
    #[cfg(feature = "tensorboard")]
    pub fn create(log_dir: impl AsRef<Path>) -> Result<Self> {
        let scalars = Box::new(TensorBoardLogger::create(log_dir.as_ref())?);
        Self::with_sink(log_dir, scalars)
    }

    /// Open a recorder over an explicit scalar sink.
    pub fn with_sink(log_dir: impl AsRef<Path>, scalars: Box<dyn MetricLogger>) -> Result<Self> {
        let log_dir = log_dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("logger.log"))?;

        Ok(Self {
            run: RunContext::new(log_dir),
            log_file: BufWriter::new(file),
            scalars,
        })
    }

    /// The run context owned by this recorder.
    pub fn run(&self) -> &RunContext {
        &self.run
    }

    /// Episodes recorded so far.
    pub fn episodes(&self) -> u64 {
        self.run.episodes
    }

    /// Record a finished episode.
    ///
    /// Bumps the episode counter (the first call records episode 1),
    /// writes the log line, then emits reward/length scalars plus two
    /// derived scalars per option: the mean activation length (0 for an
    /// empty sequence) and the fraction of episode steps attributed to
    /// the option. Option statistics with `episode_steps == 0` are an
    /// error; the log line and reward scalars have been emitted by then.
    pub fn record_episode(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.run.episodes += 1;
        let ep = self.run.episodes;

        let line = format!(
            "> ep {} done. total_steps={} | reward={} | episode_steps={} | hours={:.3} | epsilon={:.3}",
            ep,
            summary.total_steps,
            summary.reward,
            summary.episode_steps,
            self.run.elapsed_hours(),
            summary.epsilon
        );
        tracing::info!("{}", line);
        writeln!(self.log_file, "[{}] {}", unix_timestamp(), line)?;
        self.log_file.flush()?;

        self.scalars.log_scalar("episodic_rewards", summary.reward, ep);
        self.scalars
            .log_scalar("episode_lengths", summary.episode_steps as f64, ep);

        if summary.episode_steps == 0 && !summary.option_lengths.is_empty() {
            return Err(OcenvError::InvalidInput(
                "episode_steps must be positive to attribute option activity".to_string(),
            ));
        }

        for (option, lengths) in &summary.option_lengths {
            let total: f64 = lengths.iter().map(|&l| l as f64).sum();
            let mean = if lengths.is_empty() {
                0.0
            } else {
                total / lengths.len() as f64
            };
            self.scalars
                .log_scalar(&format!("option_{}_avg_length", option), mean, ep);
            self.scalars.log_scalar(
                &format!("option_{}_active", option),
                total / summary.episode_steps as f64,
                ep,
            );
        }

        Ok(())
    }

    /// Record scalars for one optimization step.
    ///
    /// Absent losses are a valid "not computed this step" state and are
    /// skipped; entropy and epsilon are always emitted.
    pub fn record_step(&mut self, record: &StepRecord) {
        if let Some(loss) = record.actor_loss {
            self.scalars.log_scalar("actor_loss", loss, record.step);
        }
        if let Some(loss) = record.critic_loss {
            self.scalars.log_scalar("critic_loss", loss, record.step);
        }
        self.scalars
            .log_scalar("policy_entropy", record.entropy, record.step);
        self.scalars.log_scalar("epsilon", record.epsilon, record.step);
    }

    /// Flush both the text log and the scalar sink.
    pub fn close(&mut self) -> Result<()> {
        self.log_file.flush()?;
        self.scalars.close();
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        let _ = self.log_file.flush();
    }
}

/// Current unix timestamp in seconds.
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Sink that captures every scalar for assertions.
    #[derive(Clone, Default)]
    struct CaptureLogger {
        scalars: Arc<Mutex<Vec<(String, f64, u64)>>>,
    }

    impl CaptureLogger {
        fn get(&self, name: &str) -> Option<(f64, u64)> {
            self.scalars
                .lock()
                .unwrap()
                .iter()
                .find(|(n, _, _)| n == name)
                .map(|(_, v, s)| (*v, *s))
        }
    }

    impl MetricLogger for CaptureLogger {
        fn log_scalar(&self, name: &str, value: f64, step: u64) {
            self.scalars
                .lock()
                .unwrap()
                .push((name.to_string(), value, step));
        }

        fn log_metrics(&self, metrics: &HashMap<String, f64>, step: u64) {
            for (name, value) in metrics {
                self.log_scalar(name, *value, step);
            }
        }
    }

    fn make_recorder(dir: &Path) -> (Recorder, CaptureLogger) {
        let sink = CaptureLogger::default();
        let recorder = Recorder::with_sink(dir, Box::new(sink.clone())).unwrap();
        (recorder, sink)
    }

    #[test]
    fn test_episode_counter_starts_at_one_and_increments() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, sink) = make_recorder(dir.path());

        recorder
            .record_episode(&EpisodeSummary::new(100, 1.5, 100, 0.9))
            .unwrap();
        assert_eq!(recorder.episodes(), 1);
        assert_eq!(sink.get("episodic_rewards"), Some((1.5, 1)));

        recorder
            .record_episode(&EpisodeSummary::new(200, 2.0, 100, 0.8))
            .unwrap();
        assert_eq!(recorder.episodes(), 2);
    }

    #[test]
    fn test_empty_option_sequence_records_zero_mean() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, sink) = make_recorder(dir.path());

        let mut options = HashMap::new();
        options.insert(3usize, Vec::new());
        recorder
            .record_episode(&EpisodeSummary::new(50, 0.0, 50, 1.0).with_option_lengths(options))
            .unwrap();

        assert_eq!(sink.get("option_3_avg_length"), Some((0.0, 1)));
        assert_eq!(sink.get("option_3_active"), Some((0.0, 1)));
    }

    #[test]
    fn test_option_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, sink) = make_recorder(dir.path());

        let mut options = HashMap::new();
        options.insert(0usize, vec![2, 4, 6]);
        recorder
            .record_episode(&EpisodeSummary::new(24, 1.0, 24, 0.5).with_option_lengths(options))
            .unwrap();

        assert_eq!(sink.get("option_0_avg_length"), Some((4.0, 1)));
        assert_eq!(sink.get("option_0_active"), Some((0.5, 1)));
    }

    #[test]
    fn test_zero_episode_steps_with_options_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, _sink) = make_recorder(dir.path());

        let mut options = HashMap::new();
        options.insert(0usize, vec![1]);
        let err = recorder
            .record_episode(&EpisodeSummary::new(0, 0.0, 0, 1.0).with_option_lengths(options))
            .unwrap_err();
        assert!(matches!(err, OcenvError::InvalidInput(_)));
    }

    #[test]
    fn test_step_record_skips_absent_losses() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, sink) = make_recorder(dir.path());

        recorder.record_step(&StepRecord::new(10, 0.7, 0.3).with_critic_loss(0.25));

        assert_eq!(sink.get("actor_loss"), None);
        assert_eq!(sink.get("critic_loss"), Some((0.25, 10)));
        assert_eq!(sink.get("policy_entropy"), Some((0.7, 10)));
        assert_eq!(sink.get("epsilon"), Some((0.3, 10)));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        {
            let (mut recorder, _sink) = make_recorder(dir.path());
            recorder
                .record_episode(&EpisodeSummary::new(10, 1.0, 10, 1.0))
                .unwrap();
        }
        {
            let (mut recorder, _sink) = make_recorder(dir.path());
            recorder
                .record_episode(&EpisodeSummary::new(20, 2.0, 10, 0.9))
                .unwrap();
        }

        let contents = fs::read_to_string(dir.path().join("logger.log")).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("> ep 1 done."));
        assert!(contents.contains("total_steps=20"));
    }
}
