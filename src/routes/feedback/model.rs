use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    Student,
    Parent,
    Teacher,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "13-17")]
    From13To17,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationLevel {
    HighSchool,
    Undergraduate,
    Postgraduate,
    Professional,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppUsageDuration {
    FirstTime,
    LessThanWeek,
    #[serde(rename = "1-4-weeks")]
    OneToFourWeeks,
    #[serde(rename = "1-3-months")]
    OneToThreeMonths,
    #[serde(rename = "3-6-months")]
    ThreeToSixMonths,
    #[serde(rename = "6-months-plus")]
    SixMonthsPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureUsed {
    PeerChat,
    AiEducator,
    Resources,
    Dashboard,
    MoodTracking,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StressReductionLevel {
    SignificantImprovement,
    ModerateImprovement,
    SlightImprovement,
    NoChange,
    MadeWorse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnicalIssue {
    SlowLoading,
    Crashes,
    LoginIssues,
    ChatProblems,
    AiNotResponding,
    ResourceLoading,
    Other,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceType {
    MobileAndroid,
    MobileIos,
    DesktopWindows,
    DesktopMac,
    Tablet,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrivacyComfortLevel {
    VeryComfortable,
    Comfortable,
    Neutral,
    Uncomfortable,
    VeryUncomfortable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmotionalSupport {
    Excellent,
    Good,
    Average,
    Poor,
    VeryPoor,
}

/// Serde wire value of an enum variant, used when storing enums as text.
fn wire_str<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Raw survey submission. Enum membership and numeric types are enforced by
/// deserialization; presence, bounds, and lengths by `validate`. Non-numeric
/// input in a rating field fails deserialization instead of being coerced.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub user_type: Option<UserType>,
    pub age_range: Option<AgeRange>,
    pub education_level: Option<EducationLevel>,
    pub app_usage_duration: Option<AppUsageDuration>,
    pub primary_feature_used: Option<Vec<FeatureUsed>>,
    pub overall_experience: Option<i32>,
    pub ease_of_use: Option<i32>,
    pub helpfulness_rating: Option<i32>,
    pub design_rating: Option<i32>,
    pub peer_chat_rating: Option<i32>,
    pub peer_chat_comments: Option<String>,
    pub ai_educator_rating: Option<i32>,
    pub ai_educator_comments: Option<String>,
    pub resources_rating: Option<i32>,
    pub resources_comments: Option<String>,
    pub stress_reduction_level: Option<StressReductionLevel>,
    pub recommendation_likelihood: Option<i32>,
    pub most_helpful_feature: Option<String>,
    pub least_helpful_feature: Option<String>,
    pub suggestion_for_improvement: Option<String>,
    pub additional_feature_request: Option<String>,
    pub general_comments: Option<String>,
    pub technical_issues_encountered: Option<Vec<TechnicalIssue>>,
    pub device_type: Option<DeviceType>,
    pub privacy_comfort_level: Option<PrivacyComfortLevel>,
    pub safety_rating: Option<i32>,
    pub emotional_support_received: Option<EmotionalSupport>,
    pub would_use_again: Option<bool>,
}

/// A submission that passed validation, ready to persist.
#[derive(Debug)]
pub struct FeedbackRecord {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub user_type: UserType,
    pub age_range: AgeRange,
    pub education_level: Option<EducationLevel>,
    pub app_usage_duration: AppUsageDuration,
    pub primary_feature_used: Vec<FeatureUsed>,
    pub overall_experience: i32,
    pub ease_of_use: i32,
    pub helpfulness_rating: i32,
    pub design_rating: i32,
    pub peer_chat_rating: Option<i32>,
    pub peer_chat_comments: Option<String>,
    pub ai_educator_rating: Option<i32>,
    pub ai_educator_comments: Option<String>,
    pub resources_rating: Option<i32>,
    pub resources_comments: Option<String>,
    pub stress_reduction_level: Option<StressReductionLevel>,
    pub recommendation_likelihood: i32,
    pub most_helpful_feature: Option<String>,
    pub least_helpful_feature: Option<String>,
    pub suggestion_for_improvement: String,
    pub additional_feature_request: Option<String>,
    pub general_comments: Option<String>,
    pub technical_issues_encountered: Vec<TechnicalIssue>,
    pub device_type: DeviceType,
    pub privacy_comfort_level: PrivacyComfortLevel,
    pub safety_rating: i32,
    pub emotional_support_received: Option<EmotionalSupport>,
    pub would_use_again: bool,
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn check_len(value: &Option<String>, field: &str, max: usize) -> Result<(), String> {
    match value {
        Some(s) if s.trim().len() > max => Err(format!(
            "{} must be at most {} characters",
            field, max
        )),
        _ => Ok(()),
    }
}

fn check_scale(value: i32, field: &str, min: i32, max: i32) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}", field, min, max));
    }
    Ok(())
}

fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn plausible_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    !digits.is_empty()
        && digits.len() <= 16
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

impl FeedbackSubmission {
    /// First violation wins, mirroring the survey form's error reporting.
    pub fn validate(self) -> Result<FeedbackRecord, String> {
        let mut missing: Vec<&str> = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.email) {
            missing.push("email");
        }
        if blank(&self.phone_number) {
            missing.push("phoneNumber");
        }
        if self.user_type.is_none() {
            missing.push("userType");
        }
        if self.age_range.is_none() {
            missing.push("ageRange");
        }
        if self.app_usage_duration.is_none() {
            missing.push("appUsageDuration");
        }
        if self.primary_feature_used.is_none() {
            missing.push("primaryFeatureUsed");
        }
        if self.overall_experience.is_none() {
            missing.push("overallExperience");
        }
        if self.ease_of_use.is_none() {
            missing.push("easeOfUse");
        }
        if self.helpfulness_rating.is_none() {
            missing.push("helpfulnessRating");
        }
        if self.design_rating.is_none() {
            missing.push("designRating");
        }
        if self.recommendation_likelihood.is_none() {
            missing.push("recommendationLikelihood");
        }
        if blank(&self.suggestion_for_improvement) {
            missing.push("suggestionForImprovement");
        }
        if self.privacy_comfort_level.is_none() {
            missing.push("privacyComfortLevel");
        }
        if self.safety_rating.is_none() {
            missing.push("safetyRating");
        }
        if self.would_use_again.is_none() {
            missing.push("wouldUseAgain");
        }
        if self.device_type.is_none() {
            missing.push("deviceType");
        }
        if !missing.is_empty() {
            return Err(format!(
                "Please fill out all required fields: {}",
                missing.join(", ")
            ));
        }

        let primary_feature_used = self.primary_feature_used.unwrap_or_default();
        if primary_feature_used.is_empty() {
            return Err("Please select at least one primary feature used.".to_string());
        }

        let email = self
            .email
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !plausible_email(&email) {
            return Err("Please enter a valid email".to_string());
        }

        let phone_number = self.phone_number.unwrap_or_default().trim().to_string();
        if !plausible_phone(&phone_number) {
            return Err("Please enter a valid phone number".to_string());
        }

        let overall_experience = self.overall_experience.unwrap_or_default();
        let ease_of_use = self.ease_of_use.unwrap_or_default();
        let helpfulness_rating = self.helpfulness_rating.unwrap_or_default();
        let design_rating = self.design_rating.unwrap_or_default();
        let safety_rating = self.safety_rating.unwrap_or_default();
        let recommendation_likelihood = self.recommendation_likelihood.unwrap_or_default();

        check_scale(overall_experience, "overallExperience", 1, 5)?;
        check_scale(ease_of_use, "easeOfUse", 1, 5)?;
        check_scale(helpfulness_rating, "helpfulnessRating", 1, 5)?;
        check_scale(design_rating, "designRating", 1, 5)?;
        check_scale(safety_rating, "safetyRating", 1, 5)?;
        check_scale(recommendation_likelihood, "recommendationLikelihood", 0, 10)?;

        for (value, field) in [
            (self.peer_chat_rating, "peerChatRating"),
            (self.ai_educator_rating, "aiEducatorRating"),
            (self.resources_rating, "resourcesRating"),
        ] {
            if let Some(rating) = value {
                check_scale(rating, field, 1, 5)?;
            }
        }

        check_len(&self.name, "name", 100)?;
        check_len(&self.peer_chat_comments, "peerChatComments", 500)?;
        check_len(&self.ai_educator_comments, "aiEducatorComments", 500)?;
        check_len(&self.resources_comments, "resourcesComments", 500)?;
        check_len(&self.most_helpful_feature, "mostHelpfulFeature", 300)?;
        check_len(&self.least_helpful_feature, "leastHelpfulFeature", 300)?;
        check_len(&self.suggestion_for_improvement, "suggestionForImprovement", 1000)?;
        check_len(&self.additional_feature_request, "additionalFeatureRequest", 500)?;
        check_len(&self.general_comments, "generalComments", 1000)?;

        Ok(FeedbackRecord {
            name: self.name.unwrap_or_default().trim().to_string(),
            email,
            phone_number,
            user_type: self.user_type.unwrap_or(UserType::Other),
            age_range: self.age_range.unwrap_or(AgeRange::From18To24),
            education_level: self.education_level,
            app_usage_duration: self
                .app_usage_duration
                .unwrap_or(AppUsageDuration::FirstTime),
            primary_feature_used,
            overall_experience,
            ease_of_use,
            helpfulness_rating,
            design_rating,
            peer_chat_rating: self.peer_chat_rating,
            peer_chat_comments: trimmed(self.peer_chat_comments),
            ai_educator_rating: self.ai_educator_rating,
            ai_educator_comments: trimmed(self.ai_educator_comments),
            resources_rating: self.resources_rating,
            resources_comments: trimmed(self.resources_comments),
            stress_reduction_level: self.stress_reduction_level,
            recommendation_likelihood,
            most_helpful_feature: trimmed(self.most_helpful_feature),
            least_helpful_feature: trimmed(self.least_helpful_feature),
            suggestion_for_improvement: self
                .suggestion_for_improvement
                .unwrap_or_default()
                .trim()
                .to_string(),
            additional_feature_request: trimmed(self.additional_feature_request),
            general_comments: trimmed(self.general_comments),
            technical_issues_encountered: self.technical_issues_encountered.unwrap_or_default(),
            device_type: self.device_type.unwrap_or(DeviceType::Other),
            privacy_comfort_level: self
                .privacy_comfort_level
                .unwrap_or(PrivacyComfortLevel::Neutral),
            safety_rating,
            emotional_support_received: self.emotional_support_received,
            would_use_again: self.would_use_again.unwrap_or_default(),
        })
    }
}

impl FeedbackRecord {
    pub async fn insert(
        &self,
        pool: &PgPool,
        ip_address: Option<String>,
    ) -> Result<String, sqlx::Error> {
        let feedback_id = Uuid::new_v4().to_string();

        let primary: Vec<String> = self.primary_feature_used.iter().map(wire_str).collect();
        let issues: Vec<String> = self
            .technical_issues_encountered
            .iter()
            .map(wire_str)
            .collect();

        sqlx::query(
            r#"
            INSERT INTO feedback (
                feedback_id, name, email, phone_number, user_type, age_range,
                education_level, app_usage_duration, primary_feature_used,
                overall_experience, ease_of_use, helpfulness_rating, design_rating,
                peer_chat_rating, peer_chat_comments, ai_educator_rating,
                ai_educator_comments, resources_rating, resources_comments,
                stress_reduction_level, recommendation_likelihood,
                most_helpful_feature, least_helpful_feature,
                suggestion_for_improvement, additional_feature_request,
                general_comments, technical_issues_encountered, device_type,
                privacy_comfort_level, safety_rating, emotional_support_received,
                would_use_again, ip_address
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                $29, $30, $31, $32, $33
            )
            "#,
        )
        .bind(&feedback_id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.phone_number)
        .bind(wire_str(&self.user_type))
        .bind(wire_str(&self.age_range))
        .bind(self.education_level.as_ref().map(wire_str))
        .bind(wire_str(&self.app_usage_duration))
        .bind(primary)
        .bind(self.overall_experience)
        .bind(self.ease_of_use)
        .bind(self.helpfulness_rating)
        .bind(self.design_rating)
        .bind(self.peer_chat_rating)
        .bind(self.peer_chat_comments.as_deref())
        .bind(self.ai_educator_rating)
        .bind(self.ai_educator_comments.as_deref())
        .bind(self.resources_rating)
        .bind(self.resources_comments.as_deref())
        .bind(self.stress_reduction_level.as_ref().map(wire_str))
        .bind(self.recommendation_likelihood)
        .bind(self.most_helpful_feature.as_deref())
        .bind(self.least_helpful_feature.as_deref())
        .bind(&self.suggestion_for_improvement)
        .bind(self.additional_feature_request.as_deref())
        .bind(self.general_comments.as_deref())
        .bind(issues)
        .bind(wire_str(&self.device_type))
        .bind(wire_str(&self.privacy_comfort_level))
        .bind(self.safety_rating)
        .bind(self.emotional_support_received.as_ref().map(wire_str))
        .bind(self.would_use_again)
        .bind(ip_address)
        .execute(pool)
        .await?;

        Ok(feedback_id)
    }
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AverageRatings {
    pub avg_overall_experience: Option<f64>,
    pub avg_ease_of_use: Option<f64>,
    pub avg_helpfulness: Option<f64>,
    pub avg_design: Option<f64>,
    pub avg_recommendation: Option<f64>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeCount {
    pub user_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentFeedback {
    pub name: String,
    pub user_type: String,
    pub overall_experience: i32,
    pub submission_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total_feedbacks: i64,
    pub average_ratings: AverageRatings,
    pub user_type_distribution: Vec<UserTypeCount>,
    pub recent_feedbacks: Vec<RecentFeedback>,
}

impl FeedbackStats {
    pub async fn collect(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let total_feedbacks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
            .fetch_one(pool)
            .await?;

        let average_ratings = sqlx::query_as::<_, AverageRatings>(
            r#"
            SELECT AVG(overall_experience)::float8       AS avg_overall_experience,
                   AVG(ease_of_use)::float8              AS avg_ease_of_use,
                   AVG(helpfulness_rating)::float8       AS avg_helpfulness,
                   AVG(design_rating)::float8            AS avg_design,
                   AVG(recommendation_likelihood)::float8 AS avg_recommendation
            FROM feedback
            "#,
        )
        .fetch_one(pool)
        .await?;

        let user_type_distribution = sqlx::query_as::<_, UserTypeCount>(
            r#"
            SELECT user_type, COUNT(*) AS count
            FROM feedback
            GROUP BY user_type
            "#,
        )
        .fetch_all(pool)
        .await?;

        let recent_feedbacks = sqlx::query_as::<_, RecentFeedback>(
            r#"
            SELECT name, user_type, overall_experience, submission_date
            FROM feedback
            ORDER BY submission_date DESC
            LIMIT 10
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(FeedbackStats {
            total_feedbacks,
            average_ratings,
            user_type_distribution,
            recent_feedbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> FeedbackSubmission {
        serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.com",
            "phoneNumber": "+919876543210",
            "userType": "student",
            "ageRange": "18-24",
            "appUsageDuration": "1-4-weeks",
            "primaryFeatureUsed": ["peer-chat", "ai-educator"],
            "overallExperience": 4,
            "easeOfUse": 5,
            "helpfulnessRating": 4,
            "designRating": 3,
            "recommendationLikelihood": 9,
            "suggestionForImprovement": "More resources on exam stress.",
            "privacyComfortLevel": "comfortable",
            "safetyRating": 5,
            "wouldUseAgain": true,
            "deviceType": "mobile-android"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_submission() {
        let record = submission().validate().unwrap();
        assert_eq!(record.user_type, UserType::Student);
        assert_eq!(record.primary_feature_used.len(), 2);
        assert_eq!(record.email, "asha@example.com");
        assert!(record.would_use_again);
    }

    #[test]
    fn test_missing_fields_listed() {
        let mut sub = submission();
        sub.name = None;
        sub.safety_rating = None;
        let err = sub.validate().unwrap_err();
        assert!(err.starts_with("Please fill out all required fields:"));
        assert!(err.contains("name"));
        assert!(err.contains("safetyRating"));
    }

    #[test]
    fn test_blank_string_counts_as_missing() {
        let mut sub = submission();
        sub.suggestion_for_improvement = Some("   ".into());
        let err = sub.validate().unwrap_err();
        assert!(err.contains("suggestionForImprovement"));
    }

    #[test]
    fn test_empty_primary_features() {
        let mut sub = submission();
        sub.primary_feature_used = Some(vec![]);
        assert_eq!(
            sub.validate().unwrap_err(),
            "Please select at least one primary feature used."
        );
    }

    #[test]
    fn test_rating_out_of_bounds() {
        let mut sub = submission();
        sub.overall_experience = Some(7);
        assert_eq!(
            sub.validate().unwrap_err(),
            "overallExperience must be between 1 and 5"
        );

        let mut sub = submission();
        sub.recommendation_likelihood = Some(11);
        assert_eq!(
            sub.validate().unwrap_err(),
            "recommendationLikelihood must be between 0 and 10"
        );
    }

    #[test]
    fn test_optional_sub_rating_bounds() {
        let mut sub = submission();
        sub.peer_chat_rating = Some(0);
        assert_eq!(
            sub.validate().unwrap_err(),
            "peerChatRating must be between 1 and 5"
        );
    }

    #[test]
    fn test_comment_length_cap() {
        let mut sub = submission();
        sub.general_comments = Some("x".repeat(1001));
        assert_eq!(
            sub.validate().unwrap_err(),
            "generalComments must be at most 1000 characters"
        );
    }

    #[test]
    fn test_non_numeric_rating_rejected_at_parse() {
        // no silent coercion to zero
        let result: Result<FeedbackSubmission, _> = serde_json::from_value(serde_json::json!({
            "overallExperience": "five"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_enum_value_rejected_at_parse() {
        let result: Result<FeedbackSubmission, _> = serde_json::from_value(serde_json::json!({
            "deviceType": "smart-fridge"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_email_and_phone_checks() {
        let mut sub = submission();
        sub.email = Some("not-an-email".into());
        assert_eq!(sub.validate().unwrap_err(), "Please enter a valid email");

        let mut sub = submission();
        sub.phone_number = Some("call-me".into());
        assert_eq!(
            sub.validate().unwrap_err(),
            "Please enter a valid phone number"
        );
    }

    #[test]
    fn test_wire_str() {
        assert_eq!(wire_str(&AppUsageDuration::OneToFourWeeks), "1-4-weeks");
        assert_eq!(wire_str(&TechnicalIssue::AiNotResponding), "ai-not-responding");
        assert_eq!(wire_str(&AgeRange::Over55), "55+");
    }
}
