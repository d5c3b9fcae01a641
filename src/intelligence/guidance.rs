// ABOUTME: Static per-phase guidance lookup consumed by the orchestration layer
// ABOUTME: Short focus descriptions and key actions keyed by decided phase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Phase guidance lookup
//!
//! Static coaching text keyed by decided phase: a short focus description and
//! an ordered list of key actions. Used only by the orchestration layer to word
//! transition recommendations; the scoring engine never reads it.

use crate::models::MarchPhase;

/// Static guidance for one phase
#[derive(Debug, Clone, Copy)]
pub struct PhaseGuidance {
    /// Short description of what this phase focuses on
    pub focus: &'static str,
    /// Ordered key actions for a client in this phase
    pub key_actions: &'static [&'static str],
}

/// Look up the static guidance for a phase
#[must_use]
pub const fn phase_guidance(phase: MarchPhase) -> PhaseGuidance {
    match phase {
        MarchPhase::Mitochondria => PhaseGuidance {
            focus: "Rebuild the energy foundation: sleep, light movement, and cellular recovery",
            key_actions: &[
                "Protect a consistent 7.5h+ sleep window",
                "Keep daily steps above 6000 with easy walks",
                "Hold training at low intensity until HRV recovers",
            ],
        },
        MarchPhase::AbsorptionDetox => PhaseGuidance {
            focus: "Restore digestive function before loading the system elsewhere",
            key_actions: &[
                "Run a structured elimination of the flagged reactive foods",
                "Eat slowly and stop at 80% fullness to reduce bloating",
                "Track stool form daily until it settles in the 3-5 range",
            ],
        },
        MarchPhase::Resilience => PhaseGuidance {
            focus: "Expand stress capacity and recovery quality",
            key_actions: &[
                "Add a daily downshift practice (breathwork or a short walk)",
                "Cap high-RPE sessions until stress scores drop below 3",
                "Keep sleep and wake times within a one-hour band",
            ],
        },
        MarchPhase::Cyclical => PhaseGuidance {
            focus: "Align training and nutrition with the current cycle phase",
            key_actions: &[
                "Reduce intensity on menstrual days and favor mobility work",
                "Front-load carbohydrate and iron-rich foods where symptoms peak",
                "Log PMS severity daily to sharpen next cycle's plan",
            ],
        },
        MarchPhase::HypertrophyHealthspan => PhaseGuidance {
            focus: "Capitalize on stability: progressive strength and longevity work",
            key_actions: &[
                "Progress volume load 2-5% per week while signals stay green",
                "Anchor 3+ strength sessions weekly with full recovery days",
                "Keep protein at 1.6-2.2 g/kg to support the building block",
            ],
        },
    }
}
