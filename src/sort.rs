use crate::model::Student;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::extensions::unicode::{key, value};
use icu_locid::subtags::{language, region, script};
use icu_locid::Locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortCriterion {
    #[default]
    Id,
    ScoreDesc,
    ScoreAsc,
    Name,
}

impl SortCriterion {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" | "ID" => Some(Self::Id),
            "scoreDesc" | "SCORE_DESC" => Some(Self::ScoreDesc),
            "scoreAsc" | "SCORE_ASC" => Some(Self::ScoreAsc),
            "name" | "NAME" => Some(Self::Name),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ScoreDesc => "scoreDesc",
            Self::ScoreAsc => "scoreAsc",
            Self::Name => "name",
        }
    }

    /// Only the high-to-low board shows rank badges.
    pub fn shows_rank(self) -> bool {
        self == Self::ScoreDesc
    }
}

/// Name comparison for the board's locale. Falls back to code-point order
/// when no collation data can be loaded for the tag.
pub struct NameCollator {
    locale: String,
    inner: Option<Collator>,
}

impl NameCollator {
    pub fn new(locale_tag: &str) -> Self {
        let mut locale = match locale_tag.parse::<Locale>() {
            Ok(locale) => locale,
            Err(e) => {
                tracing::warn!(locale = locale_tag, error = ?e, "bad collation locale; using code-point order");
                return Self {
                    locale: locale_tag.to_string(),
                    inner: None,
                };
            }
        };
        prefer_stroke_order(&mut locale);

        let inner = match Collator::try_new(&(&locale).into(), CollatorOptions::new()) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(locale = %locale, error = ?e, "collator unavailable; using code-point order");
                None
            }
        };
        Self {
            locale: locale.to_string(),
            inner,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.inner {
            Some(c) => c.compare(a, b),
            None => a.cmp(b),
        }
    }
}

/// Chinese collation data defaults to pinyin. Traditional Chinese tags get
/// stroke order unless the tag already names a collation.
fn prefer_stroke_order(locale: &mut Locale) {
    let id = &locale.id;
    let traditional = id.script == Some(script!("Hant"))
        || matches!(id.region, Some(r) if r == region!("HK") || r == region!("MO") || r == region!("TW"));
    if id.language != language!("zh") || !traditional {
        return;
    }
    let keywords = &mut locale.extensions.unicode.keywords;
    if keywords.get(&key!("co")).is_none() {
        keywords.set(key!("co"), value!("stroke"));
    }
}

fn cmp_id(a: &Student, b: &Student) -> Ordering {
    match (a.id_rank(), b.id_rank()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns a new ordering of `students`; the input is left untouched. Every
/// criterion is stable, so ties keep encounter order.
pub fn sort_students(
    students: &[Student],
    criterion: SortCriterion,
    collator: &NameCollator,
) -> Vec<Student> {
    let mut list = students.to_vec();
    match criterion {
        SortCriterion::Id => list.sort_by(cmp_id),
        SortCriterion::ScoreDesc => list.sort_by(|a, b| b.points.cmp(&a.points)),
        SortCriterion::ScoreAsc => list.sort_by(|a, b| a.points.cmp(&b.points)),
        SortCriterion::Name => list.sort_by(|a, b| collator.compare(&a.name, &b.name)),
    }
    list
}

/// 1-based display rank per position, present only for rank-showing sorts.
pub fn display_ranks(len: usize, criterion: SortCriterion) -> Vec<Option<usize>> {
    (0..len)
        .map(|i| criterion.shows_rank().then_some(i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(id: &str, name: &str, points: i64) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            points,
            plus_count: 0,
            minus_count: 0,
            pokemon_id: 1,
        }
    }

    fn ids(list: &[Student]) -> Vec<&str> {
        list.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn id_sort_is_numeric_not_lexicographic() {
        let c = NameCollator::new("en");
        let input = vec![s("10", "a", 0), s("2", "b", 0), s("1", "c", 0)];
        let out = sort_students(&input, SortCriterion::Id, &c);
        assert_eq!(ids(&out), vec!["1", "2", "10"]);
        assert_eq!(ids(&input), vec!["10", "2", "1"]);
    }

    #[test]
    fn score_sorts_keep_tie_order() {
        let c = NameCollator::new("en");
        let input = vec![
            s("1", "a", 5),
            s("2", "b", 9),
            s("3", "c", 5),
            s("4", "d", -2),
        ];
        let desc = sort_students(&input, SortCriterion::ScoreDesc, &c);
        assert_eq!(ids(&desc), vec!["2", "1", "3", "4"]);
        let asc = sort_students(&input, SortCriterion::ScoreAsc, &c);
        assert_eq!(ids(&asc), vec!["4", "1", "3", "2"]);
    }

    #[test]
    fn name_sort_uses_collation() {
        let c = NameCollator::new("en");
        let input = vec![s("1", "Banana", 0), s("2", "apple", 0), s("3", "cherry", 0)];
        let out = sort_students(&input, SortCriterion::Name, &c);
        // A byte compare would put "Banana" first.
        assert_eq!(ids(&out), vec!["2", "1", "3"]);

        let zh = NameCollator::new("zh-HK");
        assert_eq!(zh.compare("丁子皓", "黃芊諭"), Ordering::Less);
    }

    #[test]
    fn hong_kong_names_sort_by_stroke_count() {
        let zh = NameCollator::new("zh-HK");
        assert_eq!(zh.locale(), "zh-HK-u-co-stroke");
        assert_eq!(zh.compare("丁子皓", "陳芷柔"), Ordering::Less);
        assert_eq!(zh.compare("一", "陳"), Ordering::Less);

        let input = vec![s("1", "陳芷柔", 0), s("2", "丁子皓", 0), s("3", "一", 0)];
        assert_eq!(ids(&sort_students(&input, SortCriterion::Name, &zh)), vec!["3", "2", "1"]);

        assert_eq!(NameCollator::new("zh-Hant").locale(), "zh-Hant-u-co-stroke");
        assert_eq!(NameCollator::new("zh-TW").locale(), "zh-TW-u-co-stroke");
    }

    #[test]
    fn explicit_collation_in_the_tag_is_kept() {
        let pinyin = NameCollator::new("zh-HK-u-co-pinyin");
        assert_eq!(pinyin.locale(), "zh-HK-u-co-pinyin");

        let mainland = NameCollator::new("zh-CN");
        assert_eq!(mainland.locale(), "zh-CN");
    }

    #[test]
    fn bad_locale_falls_back_to_code_points() {
        let c = NameCollator::new("not a locale!!");
        assert_eq!(c.compare("B", "a"), Ordering::Less);
        assert_eq!(c.locale(), "not a locale!!");
    }

    #[test]
    fn ranks_only_for_score_desc() {
        assert_eq!(
            display_ranks(3, SortCriterion::ScoreDesc),
            vec![Some(1), Some(2), Some(3)]
        );
        assert_eq!(display_ranks(2, SortCriterion::Name), vec![None, None]);
        assert_eq!(SortCriterion::parse("SCORE_DESC"), Some(SortCriterion::ScoreDesc));
        assert_eq!(SortCriterion::parse("bogus"), None);
    }

    proptest! {
        #[test]
        fn sorting_is_idempotent_and_directions_mirror(points in prop::collection::vec(-50i64..50, 0..30)) {
            let c = NameCollator::new("en");
            let input: Vec<Student> = points
                .iter()
                .enumerate()
                .map(|(i, p)| s(&(i + 1).to_string(), &format!("n{i}"), *p))
                .collect();

            for criterion in [SortCriterion::Id, SortCriterion::ScoreDesc, SortCriterion::ScoreAsc, SortCriterion::Name] {
                let once = sort_students(&input, criterion, &c);
                let twice = sort_students(&once, criterion, &c);
                prop_assert_eq!(&once, &twice);
            }

            let desc: Vec<i64> = sort_students(&input, SortCriterion::ScoreDesc, &c).iter().map(|s| s.points).collect();
            let mut asc: Vec<i64> = sort_students(&input, SortCriterion::ScoreAsc, &c).iter().map(|s| s.points).collect();
            asc.reverse();
            prop_assert_eq!(desc, asc);
        }
    }
}
