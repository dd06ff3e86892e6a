use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one scan, from target expansion to the end of onboarding.
///
/// ```text
/// Expanding -> Probing -> Enriching -> Classified -> AwaitingSelection -> Onboarding -> Done
///     |            |           |
///     x            +-----------+--> PartialResults -> AwaitingSelection
/// (RangeTooLarge / InvalidTarget)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Expanding,
    Probing,
    Enriching,
    Classified,
    PartialResults,
    AwaitingSelection,
    Onboarding,
    Done,
}

impl ScanPhase {
    pub fn can_transition_to(self, next: ScanPhase) -> bool {
        use ScanPhase::*;
        matches!(
            (self, next),
            (Expanding, Probing)
                | (Probing, Enriching)
                | (Probing, PartialResults)
                | (Enriching, Classified)
                | (Enriching, PartialResults)
                | (Classified, AwaitingSelection)
                | (PartialResults, AwaitingSelection)
                | (AwaitingSelection, Onboarding)
                | (Onboarding, Done)
        )
    }

    pub fn is_terminal_scan_phase(self) -> bool {
        matches!(self, Self::Classified | Self::PartialResults)
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Expanding => "expanding",
            Self::Probing => "probing",
            Self::Enriching => "enriching",
            Self::Classified => "classified",
            Self::PartialResults => "partial results",
            Self::AwaitingSelection => "awaiting selection",
            Self::Onboarding => "onboarding",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::ScanPhase::*;

    #[test]
    fn happy_path_is_allowed() {
        let path = [Expanding, Probing, Enriching, Classified, AwaitingSelection, Onboarding, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn partial_results_only_from_probing_or_enriching() {
        assert!(Probing.can_transition_to(PartialResults));
        assert!(Enriching.can_transition_to(PartialResults));
        assert!(!Expanding.can_transition_to(PartialResults));
        assert!(!Classified.can_transition_to(PartialResults));
        assert!(PartialResults.can_transition_to(AwaitingSelection));
    }

    #[test]
    fn no_skipping_ahead() {
        assert!(!Expanding.can_transition_to(Enriching));
        assert!(!Probing.can_transition_to(Classified));
        assert!(!Done.can_transition_to(Expanding));
    }
}
