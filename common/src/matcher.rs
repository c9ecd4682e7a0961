//! 求人照合
//!
//! 全件から始め、指定されたフィールドごとに候補を絞り込む。
//! 適用順は 年代 → 性別 → 勤務地 → 寮 → 資格（結果は順序に依存しない）。
//!
//! - 比較は大文字小文字・全角半角を区別する部分一致
//! - 勤務地は複数指定のいずれかを含めば一致（OR）
//! - 資格は指定したすべてを含む必要がある（AND）
//! - 未指定・空のフィールドは絞り込みを行わない

use crate::types::{Conditions, Dormitory, JobListing, MatchResult};

/// 条件に一致する求人を元の順序で返す
///
/// 照合結果を再度照合しても結果は変わらない。
pub fn match_jobs<'a, I>(listings: I, conditions: &Conditions) -> MatchResult<'a>
where
    I: IntoIterator<Item = &'a JobListing>,
{
    let mut candidates: Vec<&'a JobListing> = listings.into_iter().collect();

    if let Some(age) = conditions.age_bracket.as_deref().filter(|s| !s.is_empty()) {
        candidates.retain(|job| job.age_field.contains(age));
    }

    if let Some(gender) = conditions.gender.as_deref().filter(|s| !s.is_empty()) {
        candidates.retain(|job| job.gender_field.contains(gender));
    }

    let regions = non_empty(&conditions.regions);
    if !regions.is_empty() {
        candidates.retain(|job| contains_any(&job.work_location, &regions));
    }

    if conditions.dormitory != Dormitory::Unconstrained {
        let accepted = conditions.dormitory.accepted_tokens();
        candidates.retain(|job| contains_any(&job.dormitory_info, accepted));
    }

    for qualification in non_empty(&conditions.qualifications) {
        candidates.retain(|job| job.qualifications_text.contains(qualification));
    }

    MatchResult::new(candidates)
}

fn non_empty(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect()
}

fn contains_any<S: AsRef<str>>(text: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| text.contains(n.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(location: &str, quals: &str, dorm: &str, gender: &str, age: &str) -> JobListing {
        JobListing {
            work_location: location.into(),
            job_description: format!("{}の倉庫作業", location),
            salary: "月給25万円".into(),
            dormitory_info: dorm.into(),
            qualifications_text: quals.into(),
            age_field: age.into(),
            gender_field: gender.into(),
            cells: Vec::new(),
        }
    }

    fn sample() -> Vec<JobListing> {
        vec![
            listing("東京都江東区", "リフト,玉掛け", "あり", "男性", "40代"),
            listing("埼玉県川口市", "フォークリフト", "なし", "男性", "30代・40代"),
            listing("大阪府堺市", "玉掛け", "あり", "女性", "20代"),
            listing("東京都八王子市", "", "", "", ""),
            listing("千葉県船橋市", "クレーン,溶接", "寮完備", "男女不問", "50代"),
        ]
    }

    #[test]
    fn test_unconstrained_returns_all_in_order() {
        let jobs = sample();
        let result = match_jobs(&jobs, &Conditions::default());
        assert_eq!(result.len(), jobs.len());
        for (matched, original) in result.iter().zip(jobs.iter()) {
            assert!(std::ptr::eq(matched, original));
        }
    }

    #[test]
    fn test_regions_are_or() {
        let jobs = sample();
        let conditions = Conditions {
            regions: vec!["東京".into(), "埼玉".into()],
            ..Default::default()
        };
        let result = match_jobs(&jobs, &conditions);
        let locations: Vec<&str> = result.iter().map(|j| j.work_location.as_str()).collect();
        assert_eq!(locations, vec!["東京都江東区", "埼玉県川口市", "東京都八王子市"]);
    }

    #[test]
    fn test_qualifications_are_and() {
        let jobs = sample();
        let conditions = Conditions {
            qualifications: vec!["リフト".into(), "玉掛け".into()],
            ..Default::default()
        };
        let result = match_jobs(&jobs, &conditions);
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].work_location, "東京都江東区");
    }

    #[test]
    fn test_fields_combine_with_and() {
        let jobs = sample();
        let conditions = Conditions {
            age_bracket: Some("40代".into()),
            gender: Some("男性".into()),
            ..Default::default()
        };
        let result = match_jobs(&jobs, &conditions);
        assert_eq!(result.len(), 2);

        let conditions = Conditions {
            age_bracket: Some("40代".into()),
            dormitory: Dormitory::NotRequired,
            ..Default::default()
        };
        let result = match_jobs(&jobs, &conditions);
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].work_location, "埼玉県川口市");
    }

    #[test]
    fn test_dormitory_required_accepts_variants() {
        let jobs = sample();
        let conditions = Conditions {
            dormitory: Dormitory::Required,
            ..Default::default()
        };
        let locations: Vec<&str> = match_jobs(&jobs, &conditions)
            .iter()
            .map(|j| j.work_location.as_str())
            .collect();
        assert_eq!(locations, vec!["東京都江東区", "大阪府堺市", "千葉県船橋市"]);
    }

    #[test]
    fn test_blank_fields_never_match() {
        let jobs = sample();
        let conditions = Conditions {
            gender: Some("男性".into()),
            ..Default::default()
        };
        let result = match_jobs(&jobs, &conditions);
        assert!(result.iter().all(|j| !j.gender_field.is_empty()));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_empty_values_impose_no_filter() {
        let jobs = sample();
        let conditions = Conditions {
            age_bracket: Some(String::new()),
            regions: vec![String::new()],
            qualifications: vec![String::new()],
            ..Default::default()
        };
        assert_eq!(match_jobs(&jobs, &conditions).len(), jobs.len());
    }

    #[test]
    fn test_case_sensitive_substring() {
        let jobs = vec![listing("Tokyo", "", "", "", "")];
        let conditions = Conditions {
            regions: vec!["tokyo".into()],
            ..Default::default()
        };
        assert!(match_jobs(&jobs, &conditions).is_empty());
    }

    #[test]
    fn test_match_is_idempotent() {
        let jobs = sample();
        let conditions = Conditions {
            regions: vec!["東京".into(), "大阪".into()],
            dormitory: Dormitory::Required,
            ..Default::default()
        };
        let once = match_jobs(&jobs, &conditions);
        let twice = match_jobs(&once, &conditions);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
