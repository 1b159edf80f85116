//! Pipeline metrics aggregation
//!
//! The voice pipeline emits one event per stage run (recognition, inference,
//! synthesis, end-of-utterance, VAD). `MetricsSink` folds them into per-stage
//! totals and produces a `UsageSummary` at shutdown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// One metrics event from the pipeline (durations in seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineMetrics {
    Stt {
        duration: f64,
        audio_duration: f64,
    },
    Llm {
        duration: f64,
        ttft: f64,
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    Tts {
        duration: f64,
        ttfb: f64,
        characters_count: u64,
        audio_duration: f64,
    },
    Eou {
        end_of_utterance_delay: f64,
        transcription_delay: f64,
    },
    Vad {
        inference_count: u64,
        inference_duration_total: f64,
    },
}

impl PipelineMetrics {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineMetrics::Stt { .. } => "stt",
            PipelineMetrics::Llm { .. } => "llm",
            PipelineMetrics::Tts { .. } => "tts",
            PipelineMetrics::Eou { .. } => "eou",
            PipelineMetrics::Vad { .. } => "vad",
        }
    }

    /// Emit one log line for this event
    pub fn log(&self) {
        match self {
            PipelineMetrics::Stt {
                duration,
                audio_duration,
            } => info!(
                "STT metrics: duration={:.3}s audio_duration={:.3}s",
                duration, audio_duration
            ),
            PipelineMetrics::Llm {
                duration,
                ttft,
                prompt_tokens,
                completion_tokens,
            } => info!(
                "LLM metrics: duration={:.3}s ttft={:.3}s prompt_tokens={} completion_tokens={}",
                duration, ttft, prompt_tokens, completion_tokens
            ),
            PipelineMetrics::Tts {
                duration,
                ttfb,
                characters_count,
                audio_duration,
            } => info!(
                "TTS metrics: duration={:.3}s ttfb={:.3}s characters={} audio_duration={:.3}s",
                duration, ttfb, characters_count, audio_duration
            ),
            PipelineMetrics::Eou {
                end_of_utterance_delay,
                transcription_delay,
            } => info!(
                "EOU metrics: end_of_utterance_delay={:.3}s transcription_delay={:.3}s",
                end_of_utterance_delay, transcription_delay
            ),
            PipelineMetrics::Vad {
                inference_count,
                inference_duration_total,
            } => info!(
                "VAD metrics: inferences={} inference_total={:.3}s",
                inference_count, inference_duration_total
            ),
        }
    }

    fn counts(&self) -> Vec<(&'static str, u64)> {
        match self {
            PipelineMetrics::Llm {
                prompt_tokens,
                completion_tokens,
                ..
            } => vec![
                ("prompt_tokens", *prompt_tokens),
                ("completion_tokens", *completion_tokens),
            ],
            PipelineMetrics::Tts {
                characters_count, ..
            } => vec![("characters_count", *characters_count)],
            PipelineMetrics::Vad {
                inference_count, ..
            } => vec![("inference_count", *inference_count)],
            PipelineMetrics::Stt { .. } | PipelineMetrics::Eou { .. } => Vec::new(),
        }
    }

    fn durations(&self) -> Vec<(&'static str, f64)> {
        match self {
            PipelineMetrics::Stt {
                duration,
                audio_duration,
            } => vec![("duration", *duration), ("audio_duration", *audio_duration)],
            PipelineMetrics::Llm { duration, ttft, .. } => {
                vec![("duration", *duration), ("ttft", *ttft)]
            }
            PipelineMetrics::Tts {
                duration,
                ttfb,
                audio_duration,
                ..
            } => vec![
                ("duration", *duration),
                ("ttfb", *ttfb),
                ("audio_duration", *audio_duration),
            ],
            PipelineMetrics::Eou {
                end_of_utterance_delay,
                transcription_delay,
            } => vec![
                ("end_of_utterance_delay", *end_of_utterance_delay),
                ("transcription_delay", *transcription_delay),
            ],
            PipelineMetrics::Vad {
                inference_duration_total,
                ..
            } => vec![("inference_duration_total", *inference_duration_total)],
        }
    }
}

/// Accumulated totals for one pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAggregate {
    /// Number of events folded in
    pub events: u64,

    /// Summed integer counters (tokens, characters, inferences)
    pub counts: BTreeMap<String, u64>,

    /// Summed durations; kept as `Duration` so accumulation is exact
    pub durations: BTreeMap<String, Duration>,
}

impl StageAggregate {
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn duration(&self, key: &str) -> Duration {
        self.durations.get(key).copied().unwrap_or_default()
    }
}

/// Read-only usage snapshot keyed by stage name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub stages: BTreeMap<String, StageAggregate>,
}

impl UsageSummary {
    pub fn stage(&self, stage: &str) -> Option<&StageAggregate> {
        self.stages.get(stage)
    }

    pub fn llm_prompt_tokens(&self) -> u64 {
        self.count("llm", "prompt_tokens")
    }

    pub fn llm_completion_tokens(&self) -> u64 {
        self.count("llm", "completion_tokens")
    }

    pub fn tts_characters_count(&self) -> u64 {
        self.count("tts", "characters_count")
    }

    pub fn stt_audio_duration(&self) -> Duration {
        self.stage("stt")
            .map(|s| s.duration("audio_duration"))
            .unwrap_or_default()
    }

    pub fn tts_audio_duration(&self) -> Duration {
        self.stage("tts")
            .map(|s| s.duration("audio_duration"))
            .unwrap_or_default()
    }

    fn count(&self, stage: &str, key: &str) -> u64 {
        self.stage(stage).map(|s| s.count(key)).unwrap_or(0)
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "llm_prompt_tokens={}, llm_completion_tokens={}, tts_characters_count={}, \
             tts_audio_duration={:.2}s, stt_audio_duration={:.2}s",
            self.llm_prompt_tokens(),
            self.llm_completion_tokens(),
            self.tts_characters_count(),
            self.tts_audio_duration().as_secs_f64(),
            self.stt_audio_duration().as_secs_f64(),
        )
    }
}

/// Accumulates pipeline metrics until the session shuts down
#[derive(Debug, Default)]
pub struct MetricsSink {
    stages: BTreeMap<String, StageAggregate>,
    closed: bool,
    dropped: u64,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in
    ///
    /// Totals saturate instead of overflowing. Returns false if the sink was
    /// already summarized and the event dropped.
    pub fn collect(&mut self, event: &PipelineMetrics) -> bool {
        if self.closed {
            self.dropped += 1;
            warn!("Dropping late {} metrics after shutdown", event.stage());
            return false;
        }

        let stage = self.stages.entry(event.stage().to_string()).or_default();
        stage.events = stage.events.saturating_add(1);

        for (key, value) in event.counts() {
            let count = stage.counts.entry(key.to_string()).or_insert(0);
            *count = count.saturating_add(value);
        }

        for (key, secs) in event.durations() {
            let total = stage.durations.entry(key.to_string()).or_default();
            *total = total.saturating_add(to_duration(secs));
        }

        true
    }

    /// Current totals without closing the sink
    pub fn snapshot(&self) -> UsageSummary {
        UsageSummary {
            stages: self.stages.clone(),
        }
    }

    /// Final totals; later events are dropped
    pub fn summarize(&mut self) -> UsageSummary {
        self.closed = true;
        self.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Negative and NaN inputs count as zero; anything too large saturates
fn to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
