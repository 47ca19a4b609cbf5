use crate::progress::{RelapseSummary, recovery_percent};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    Starting,
    InProgress,
    Completed,
}

impl PartStatus {
    pub fn from_percent(progress: f64) -> Self {
        if progress >= 100.0 {
            PartStatus::Completed
        } else if progress > 0.0 {
            PartStatus::InProgress
        } else {
            PartStatus::Starting
        }
    }
}

pub struct BodyPart {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub max_days: u32,
    pub improvements: [(u32, &'static str); 4],
}

pub const BODY_PARTS: [BodyPart; 4] = [
    BodyPart {
        key: "brain",
        title: "Brain",
        icon: "🧠",
        max_days: 90,
        improvements: [
            (1, "Anxiety and stress levels start to decrease"),
            (7, "Mental fog begins to clear"),
            (30, "Depression and anxiety symptoms decrease"),
            (90, "Concentration and memory improve"),
        ],
    },
    BodyPart {
        key: "mouth",
        title: "Mouth",
        icon: "👄",
        max_days: 365,
        improvements: [
            (2, "Taste buds begin to recover"),
            (7, "Sense of taste significantly improves"),
            (30, "Gum health improves"),
            (365, "Reduced risk of oral cancers"),
        ],
    },
    BodyPart {
        key: "lungs",
        title: "Lungs",
        icon: "🫁",
        max_days: 90,
        improvements: [
            (1, "Carbon monoxide levels drop to normal"),
            (3, "Breathing becomes easier"),
            (30, "Lung function increases by up to 30%"),
            (90, "Coughing and shortness of breath decrease"),
        ],
    },
    BodyPart {
        key: "heart",
        title: "Heart",
        icon: "❤️",
        max_days: 365,
        improvements: [
            (1, "Heart rate and blood pressure normalize"),
            (14, "Circulation improves"),
            (90, "Risk of heart attack begins to decrease"),
            (365, "Risk of heart disease drops by 50%"),
        ],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ImprovementProgress {
    pub days: u32,
    pub text: &'static str,
    pub progress_percent: f64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartProgress {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub max_days: u32,
    pub progress_percent: f64,
    pub status: PartStatus,
    pub improvements: Vec<ImprovementProgress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryMap {
    pub overall_percent: f64,
    pub parts: Vec<PartProgress>,
}

pub fn build_recovery(
    elapsed_days: f64,
    relapse: &RelapseSummary,
    cigarettes_per_day: f64,
) -> RecoveryMap {
    let parts: Vec<PartProgress> = BODY_PARTS
        .iter()
        .map(|part| {
            let progress_percent = recovery_percent(
                elapsed_days,
                f64::from(part.max_days),
                relapse,
                cigarettes_per_day,
            );
            let improvements = part
                .improvements
                .iter()
                .map(|&(days, text)| {
                    let progress_percent = recovery_percent(
                        elapsed_days,
                        f64::from(days),
                        relapse,
                        cigarettes_per_day,
                    );
                    ImprovementProgress {
                        days,
                        text,
                        progress_percent,
                        completed: progress_percent >= 100.0,
                    }
                })
                .collect();

            PartProgress {
                key: part.key,
                title: part.title,
                icon: part.icon,
                max_days: part.max_days,
                progress_percent,
                status: PartStatus::from_percent(progress_percent),
                improvements,
            }
        })
        .collect();

    let overall_percent =
        parts.iter().map(|part| part.progress_percent).sum::<f64>() / parts.len() as f64;

    RecoveryMap {
        overall_percent,
        parts,
    }
}
