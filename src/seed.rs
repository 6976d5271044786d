use crate::model::{ClassRoster, Student};
use rand::Rng;

const CLASS_3B: [&str; 31] = [
    "陳芷柔", "陳沛詩", "鄭穎彤", "張晉熙", "朱善恆", "馮子陽", "傅玥寧", "高宇皓", "何梓瑤", "何金霏",
    "何冠奇", "黃欣彤", "黎芷楹", "黎子滔", "林子洋", "雷翊權", "李祤軒", "梁子泓", "梁皓宸", "梁依晴",
    "廖巧澄", "駱峻霆", "伍嘉豪", "蕭家軒", "譚灝楊", "丁子皓", "黃芊諭", "王美樂", "許君豪", "周海嵐",
    "朱麗媛",
];

const CLASS_4B: [&str; 23] = [
    "陳沁儀", "陳信豪", "周詩蕎", "鄭瑩瑩", "鄭泓昊", "蔣沁妍", "甘子賢", "關子謙", "謝欣晏", "黃楚堯",
    "黃翰皓", "容毓俊", "李可欣", "陸皆橋", "馬超芸", "麥嘉俐", "牟智杰", "潘思涵", "蕭珈睿", "黃一進",
    "王美琳", "趙梓琳", "趙慕辰",
];

const CLASS_4C: [&str; 23] = [
    "曾子朗", "鄭翊翔", "陳梓晴", "許芝霖", "康安娜", "胡栩豪", "黃璐媛", "黃詩皓", "嚴穎兒", "林晉毅",
    "林雅妍", "林寶堅", "李凱聰", "梁語穎", "龍紀潼", "盧航俊", "盧俊俐", "莫芷晴", "歐陽健豐", "邱佳茵",
    "余樂恆", "鍾倬民", "鍾倬承",
];

const CLASS_5B: [&str; 34] = [
    "歐陽卓軒", "陳至濠", "謝穎琳", "鄭智泓", "鄭澳因", "陳靜妍", "陳浩", "聯", "黃羲辰", "郭芷晴",
    "林安娜", "劉樂澄", "李梓樂", "李天恩", "梁康妮", "梁語翹", "梁智中", "梁賢正", "梁伽藍", "梁凱嵐",
    "劉一鳴", "盧紫君", "呂建羲", "馬梓倫", "吳子軒", "吳梓浩", "吳穎詩", "彭賢信", "施泓軒", "蕭昊恩",
    "蘇健羽", "田浩成", "唐敏裕", "黃浩藍",
];

fn seed_classes() -> [(&'static str, &'static [&'static str]); 7] {
    [
        ("三乙英文 / 3B English", &CLASS_3B[..]),
        ("三乙普通話 / 3B Mandarin", &CLASS_3B[..]),
        ("四乙普通話 / 4B Mandarin", &CLASS_4B[..]),
        ("四乙 英文 / 4B English", &CLASS_4B[..]),
        ("四丙 普通話 / 4C Mandarin", &CLASS_4C[..]),
        ("四丙公民 / 4C Citizenship", &CLASS_4C[..]),
        ("五乙普通話 / 5B Mandarin", &CLASS_5B[..]),
    ]
}

/// Class number 16 is vacant in the 3B register.
fn skips_sixteen(class_name: &str) -> bool {
    class_name.contains("3B") || class_name.contains("三乙")
}

pub fn build_roster<R: Rng + ?Sized>(
    class_name: &str,
    names: &[&str],
    pokemon_count: u32,
    rng: &mut R,
) -> ClassRoster {
    let skip = skips_sixteen(class_name);
    let mut next_id: u32 = 1;
    let mut students = Vec::with_capacity(names.len());
    for name in names {
        if skip && next_id == 16 {
            next_id += 1;
        }
        students.push(Student::new(
            next_id.to_string(),
            *name,
            random_pokemon_id(pokemon_count, rng),
        ));
        next_id += 1;
    }
    ClassRoster {
        class_name: class_name.to_string(),
        students,
    }
}

pub fn default_rosters<R: Rng + ?Sized>(pokemon_count: u32, rng: &mut R) -> Vec<ClassRoster> {
    seed_classes()
        .iter()
        .map(|(name, students)| build_roster(name, students, pokemon_count, rng))
        .collect()
}

pub fn random_pokemon_id<R: Rng + ?Sized>(pokemon_count: u32, rng: &mut R) -> u32 {
    rng.gen_range(1..=pokemon_count.max(1))
}
