use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SelectPerson,
    SelectOutfit,
    Result,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::SelectPerson, Stage::SelectOutfit, Stage::Result];

    pub fn ordinal(self) -> usize {
        match self {
            Self::SelectPerson => 0,
            Self::SelectOutfit => 1,
            Self::Result => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SelectPerson => "Person",
            Self::SelectOutfit => "Outfit",
            Self::Result => "Result",
        }
    }

    pub fn previous(self) -> Option<Stage> {
        match self {
            Self::SelectPerson => None,
            Self::SelectOutfit => Some(Self::SelectPerson),
            Self::Result => Some(Self::SelectOutfit),
        }
    }
}
