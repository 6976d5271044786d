use serde::{Deserialize, Serialize};

/// Highest avatar id; avatars are keyed 1..=POKEMON_COUNT.
pub const POKEMON_COUNT: u32 = 500;

const AVATAR_URL_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub plus_count: u64,
    pub minus_count: u64,
    pub pokemon_id: u32,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pokemon_id: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points: 0,
            plus_count: 0,
            minus_count: 0,
            pokemon_id,
        }
    }

    /// Numeric rank key used by the id sort. Non-numeric ids sort last.
    pub fn id_rank(&self) -> Option<i64> {
        leading_int(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRoster {
    pub class_name: String,
    pub students: Vec<Student>,
}

impl ClassRoster {
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Zero counts as positive.
    pub fn of(delta: i64) -> Self {
        if delta >= 0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionSource {
    Templated,
    Manual,
}

/// Label shown for free-form point entries.
pub const MANUAL_LABEL: &str = "手動輸入";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub label_primary: String,
    pub label_secondary: String,
    pub delta: i64,
    pub polarity: Polarity,
    pub source: ActionSource,
}

impl Action {
    pub fn templated(primary: &str, secondary: &str, delta: i64) -> Self {
        Self {
            label_primary: primary.to_string(),
            label_secondary: secondary.to_string(),
            delta,
            polarity: Polarity::of(delta),
            source: ActionSource::Templated,
        }
    }

    pub fn manual(delta: i64) -> Self {
        Self {
            label_primary: MANUAL_LABEL.to_string(),
            label_secondary: "Manual Entry".to_string(),
            delta,
            polarity: Polarity::of(delta),
            source: ActionSource::Manual,
        }
    }

    /// Parses teacher input for a manual entry. Anything that is not an
    /// integer yields `None` and the entry is simply not submitted.
    pub fn parse_manual(input: &str) -> Option<Self> {
        leading_int(input.trim()).map(Self::manual)
    }
}

const POSITIVE_TEMPLATES: [(&str, &str, i64); 8] = [
    ("積極參與", "Good Participation", 1),
    ("專心上課", "Well Focused", 1),
    ("認真學習", "Diligent Learning", 1),
    ("安靜吃飯", "Quiet Eating", 1),
    ("配合做課間操", "Class Exercise", 1),
    ("尊重容老師！", "Respect Miss Iong!", 3),
    ("你太讓容老師高興了😊！", "You made Miss Iong happy! 😊", 5),
    ("你簡直太棒了🥳👍！", "You are simply amazing 🥳👍!", 10),
];

const NEGATIVE_TEMPLATES: [(&str, &str, i64); 8] = [
    ("態度欠佳", "Bad Attitude", -1),
    ("過於吵鬧", "Noisy", -1),
    ("離開座位", "Leaving Seat", -1),
    ("不專心", "Not Paying Attention", -1),
    ("課上聊天", "Chatting in Class", -1),
    ("對容老師無禮", "Disrespectful", -3),
    ("你太令容老師失望了😢！", "You disappointed Miss Iong! 😢", -5),
    ("你太過分/離譜了😡！", "You have gone too far 😡!", -10),
];

pub fn positive_actions() -> Vec<Action> {
    POSITIVE_TEMPLATES
        .iter()
        .map(|(p, s, d)| Action::templated(p, s, *d))
        .collect()
}

pub fn negative_actions() -> Vec<Action> {
    NEGATIVE_TEMPLATES
        .iter()
        .map(|(p, s, d)| Action::templated(p, s, *d))
        .collect()
}

pub fn catalog_action(polarity: Polarity, index: usize) -> Option<Action> {
    let table: &[(&str, &str, i64)] = match polarity {
        Polarity::Positive => &POSITIVE_TEMPLATES,
        Polarity::Negative => &NEGATIVE_TEMPLATES,
    };
    table
        .get(index)
        .map(|(p, s, d)| Action::templated(p, s, *d))
}

/// Dictation/test/exam bonus table. Display only; nothing applies it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRule {
    pub label_primary: &'static str,
    pub label_secondary: &'static str,
    pub points: &'static str,
}

pub const SCORING_RULES: [ScoringRule; 5] = [
    ScoringRule {
        label_primary: "100或以上",
        label_secondary: "100 or above",
        points: "+25",
    },
    ScoringRule {
        label_primary: "90～99",
        label_secondary: "90～99",
        points: "+20",
    },
    ScoringRule {
        label_primary: "80～89",
        label_secondary: "80～89",
        points: "+15",
    },
    ScoringRule {
        label_primary: "70～79",
        label_secondary: "70～79",
        points: "+10",
    },
    ScoringRule {
        label_primary: "60～69",
        label_secondary: "60～69",
        points: "+5",
    },
];

pub fn avatar_url(pokemon_id: u32) -> String {
    format!("{AVATAR_URL_BASE}/{pokemon_id}.png")
}

/// Optional sign followed by at least one digit. Trailing garbage is ignored.
fn leading_int(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_treats_zero_as_positive() {
        assert_eq!(Polarity::of(0), Polarity::Positive);
        assert_eq!(Polarity::of(7), Polarity::Positive);
        assert_eq!(Polarity::of(-1), Polarity::Negative);
    }

    #[test]
    fn manual_entry_reads_leading_integer() {
        assert_eq!(Action::parse_manual("5").map(|a| a.delta), Some(5));
        assert_eq!(Action::parse_manual(" -12 ").map(|a| a.delta), Some(-12));
        assert_eq!(Action::parse_manual("+3").map(|a| a.delta), Some(3));
        assert_eq!(Action::parse_manual("4abc").map(|a| a.delta), Some(4));
        assert!(Action::parse_manual("").is_none());
        assert!(Action::parse_manual("abc").is_none());
        assert!(Action::parse_manual("-").is_none());

        let zero = Action::parse_manual("0").expect("zero parses");
        assert_eq!(zero.polarity, Polarity::Positive);
        assert_eq!(zero.source, ActionSource::Manual);
    }

    #[test]
    fn catalogs_have_consistent_polarity() {
        assert!(positive_actions()
            .iter()
            .all(|a| a.polarity == Polarity::Positive && a.delta > 0));
        assert!(negative_actions()
            .iter()
            .all(|a| a.polarity == Polarity::Negative && a.delta < 0));
        assert_eq!(
            catalog_action(Polarity::Negative, 7).map(|a| a.delta),
            Some(-10)
        );
        assert!(catalog_action(Polarity::Positive, 8).is_none());
    }

    #[test]
    fn student_json_uses_camel_case_fields() {
        let s = Student::new("3", "A", 25);
        let v = serde_json::to_value(&s).expect("serialize");
        assert_eq!(v["plusCount"], 0);
        assert_eq!(v["minusCount"], 0);
        assert_eq!(v["pokemonId"], 25);
        assert_eq!(s.id_rank(), Some(3));
    }
}
