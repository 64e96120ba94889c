//! Scripted input replayed by the `run` subcommand.
//!
//! A script is a TOML document holding an ordered list of `[[step]]` tables.
//! Each step first issues its one-shot commands (reset, next level, focus
//! loss, pause toggle, in that order) and then ticks the session `ticks`
//! times with the step's held controls.

use std::{fs, io, path::Path, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tideline_core::{Command, Intents};

/// Reasons a script cannot be loaded.
#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The script is not valid TOML or has unknown keys.
    #[error("failed to parse script")]
    Parse(#[from] toml::de::Error),
    /// The script holds no steps.
    #[error("script contains no steps")]
    Empty,
    /// A step neither ticks nor issues a command.
    #[error("step {index} does nothing; give it ticks or a command")]
    EmptyStep {
        /// Zero-based index of the step.
        index: usize,
    },
}

/// One entry of the script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Step {
    /// Number of ticks to run with the held controls.
    pub(crate) ticks: u32,
    /// Holds move-left.
    pub(crate) left: bool,
    /// Holds move-right.
    pub(crate) right: bool,
    /// Holds jump.
    pub(crate) jump: bool,
    /// Holds attack; a held attack swings once.
    pub(crate) attack: bool,
    /// Toggles pause before ticking.
    pub(crate) pause: bool,
    /// Reports a focus loss before ticking.
    pub(crate) focus_lost: bool,
    /// Loads the next level before ticking.
    pub(crate) next_level: bool,
    /// Resets the level before ticking.
    pub(crate) reset: bool,
}

impl Step {
    fn is_empty(&self) -> bool {
        self.ticks == 0 && !(self.pause || self.focus_lost || self.next_level || self.reset)
    }

    fn intents(&self) -> Intents {
        Intents {
            left: self.left,
            right: self.right,
            jump: self.jump,
            attack: self.attack,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    step: Vec<Step>,
}

/// Validated list of script steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Reads and parses the script at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses a script from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(text)?;
        if file.step.is_empty() {
            return Err(ScriptError::Empty);
        }
        if let Some(index) = file.step.iter().position(Step::is_empty) {
            return Err(ScriptError::EmptyStep { index });
        }
        Ok(Self { steps: file.step })
    }

    /// Expands the steps into the command stream fed to the session.
    pub(crate) fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.steps.iter().flat_map(|step| {
            let one_shots = [
                (step.reset, Command::ResetAll),
                (step.next_level, Command::LoadNextLevel),
                (step.focus_lost, Command::FocusLost),
                (step.pause, Command::TogglePause),
            ]
            .into_iter()
            .filter_map(|(enabled, command)| enabled.then_some(command));
            let intents = step.intents();
            one_shots.chain((0..step.ticks).map(move |_| Command::Tick { intents }))
        })
    }
}
