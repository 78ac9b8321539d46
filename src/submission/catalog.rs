/// Elective subjects offered in the entry form. Names outside this list are
/// accepted; they just won't find reference data unless the tables use them.
pub const ELECTIVE_CATALOG: [&str; 21] = [
    "中國文學",
    "英國文學",
    "歷史",
    "中國歷史",
    "地理",
    "物理",
    "化學",
    "生物",
    "經濟",
    "企業、會計與財務概論",
    "數學延伸部分(M1)",
    "數學延伸部分(M2)",
    "體育",
    "音樂",
    "視覺藝術",
    "資訊及通訊科技",
    "科技與生活",
    "倫理與宗教",
    "旅遊與款待",
    "設計與應用科技",
    "健康管理與社會關懷",
];

pub fn is_known_elective(name: &str) -> bool {
    ELECTIVE_CATALOG.contains(&name.trim())
}

/// Resolve a 1-based catalog index or a literal name.
pub fn resolve_elective(input: &str) -> String {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(n) if (1..=ELECTIVE_CATALOG.len()).contains(&n) => ELECTIVE_CATALOG[n - 1].to_string(),
        _ => input.to_string(),
    }
}
