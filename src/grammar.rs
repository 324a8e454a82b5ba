//! Closed command vocabulary of the console shell.
//!
//! Token matching is case-sensitive and the vocabulary is all-lowercase.
//! Each main command owns exactly one sub-command enumeration; whether a
//! preset value is legal depends on the (main command, sub command) pair and
//! is enforced by the command handlers, not here.

use std::fmt;

/// Default separator between tokens on an input line.
pub const TOKEN_SEPARATOR: char = ' ';

/// Default separator inside a composite `name=value` parameter token.
pub const PARAMETER_SEPARATOR: char = '=';

/// Top-level verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Save,
    Train,
    Log,
    Show,
    Exit,
}

impl MainCommand {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "save" => Some(Self::Save),
            "train" => Some(Self::Train),
            "log" => Some(Self::Log),
            "show" => Some(Self::Show),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Train => "train",
            Self::Log => "log",
            Self::Show => "show",
            Self::Exit => "exit",
        }
    }

    pub fn vocabulary() -> &'static [&'static str] {
        &["save", "train", "log", "show", "exit"]
    }
}

impl fmt::Display for MainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-commands of `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveCommand {
    All,
    Net0,
    Net1,
    Samples,
    Par,
    NetPar,
    TrainerPar,
}

impl SaveCommand {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Self::All),
            "net0" => Some(Self::Net0),
            "net1" => Some(Self::Net1),
            "samples" => Some(Self::Samples),
            "par" => Some(Self::Par),
            "netpar" => Some(Self::NetPar),
            "trainerpar" => Some(Self::TrainerPar),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Net0 => "net0",
            Self::Net1 => "net1",
            Self::Samples => "samples",
            Self::Par => "par",
            Self::NetPar => "netpar",
            Self::TrainerPar => "trainerpar",
        }
    }

    pub fn vocabulary() -> &'static [&'static str] {
        &["all", "net0", "net1", "samples", "par", "netpar", "trainerpar"]
    }
}

impl fmt::Display for SaveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-commands of `train`. `undefined` is an explicit sentinel that
/// dispatches to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainCommand {
    Start,
    Example,
    Undefined,
}

impl TrainCommand {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Self::Start),
            "example" => Some(Self::Example),
            "undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Example => "example",
            Self::Undefined => "undefined",
        }
    }

    pub fn vocabulary() -> &'static [&'static str] {
        &["start", "example", "undefined"]
    }
}

impl fmt::Display for TrainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-commands of `log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCommand {
    On,
    Off,
}

impl LogCommand {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    pub fn vocabulary() -> &'static [&'static str] {
        &["on", "off"]
    }
}

impl fmt::Display for LogCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-commands of `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Help,
    Settings,
    Net,
}

impl ShowCommand {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "help" => Some(Self::Help),
            "settings" => Some(Self::Settings),
            "net" => Some(Self::Net),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Settings => "settings",
            Self::Net => "net",
        }
    }

    pub fn vocabulary() -> &'static [&'static str] {
        &["help", "settings", "net"]
    }
}

impl fmt::Display for ShowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional modifier tokens. Which values are legal depends on the
/// (main command, sub command) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetValue {
    Indented,
    No,
    Shuffle,
    Undefined,
}

impl PresetValue {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "indented" => Some(Self::Indented),
            "no" => Some(Self::No),
            "shuffle" => Some(Self::Shuffle),
            "undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indented => "indented",
            Self::No => "no",
            Self::Shuffle => "shuffle",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for PresetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names allowed on the left side of a composite `name=value` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterName {
    Layers,
    LearningRate,
    Epochs,
    Preset,
}

impl ParameterName {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "layers" => Some(Self::Layers),
            "learning_rate" => Some(Self::LearningRate),
            "epochs" => Some(Self::Epochs),
            "preset" => Some(Self::Preset),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layers => "layers",
            Self::LearningRate => "learning_rate",
            Self::Epochs => "epochs",
            Self::Preset => "preset",
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_command_resolves_known_tokens() {
        assert_eq!(MainCommand::from_token("save"), Some(MainCommand::Save));
        assert_eq!(MainCommand::from_token("train"), Some(MainCommand::Train));
        assert_eq!(MainCommand::from_token("exit"), Some(MainCommand::Exit));
    }

    #[test]
    fn main_command_matching_is_case_sensitive() {
        assert_eq!(MainCommand::from_token("Save"), None);
        assert_eq!(MainCommand::from_token("TRAIN"), None);
    }

    #[test]
    fn save_vocabulary_lists_every_sub_command() {
        let vocabulary = SaveCommand::vocabulary();
        for token in ["all", "net0", "net1", "samples", "par", "netpar", "trainerpar"] {
            assert!(vocabulary.contains(&token), "missing {token}");
            assert!(SaveCommand::from_token(token).is_some());
        }
    }

    #[test]
    fn train_undefined_is_part_of_the_vocabulary() {
        assert_eq!(
            TrainCommand::from_token("undefined"),
            Some(TrainCommand::Undefined)
        );
        assert!(TrainCommand::vocabulary().contains(&"undefined"));
    }

    #[test]
    fn preset_value_rejects_unknown_tokens() {
        assert_eq!(PresetValue::from_token("indented"), Some(PresetValue::Indented));
        assert_eq!(PresetValue::from_token("foo"), None);
    }

    #[test]
    fn display_matches_token_spelling() {
        assert_eq!(MainCommand::Save.to_string(), "save");
        assert_eq!(SaveCommand::TrainerPar.to_string(), "trainerpar");
        assert_eq!(PresetValue::Shuffle.to_string(), "shuffle");
        assert_eq!(ParameterName::LearningRate.to_string(), "learning_rate");
    }
}
