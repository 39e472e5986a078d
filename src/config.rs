use std::env;

/// Fixed domain vocabulary. The values are the ones users see and the ones
/// stored in the database, so they stay in the product's original Chinese.
pub const FITNESS_GOALS: [&str; 6] = ["减重", "增肌", "提高耐力", "增强力量", "改善灵活性", "保持健康"];
pub const EXERCISE_TYPES: [&str; 8] = ["跑步", "游泳", "骑行", "瑜伽", "力量训练", "跳绳", "健走", "篮球"];
pub const INTENSITY_LEVELS: [&str; 3] = ["低", "中", "高"];
pub const GENDERS: [&str; 2] = ["男", "女"];

/// Goal bucket used for food recommendations when the user's goal has no
/// dedicated table entry.
pub const DEFAULT_FOOD_GOAL: &str = "保持健康";

pub const MEAL_BREAKFAST: &str = "早餐";
pub const MEAL_LUNCH: &str = "午餐";
pub const MEAL_DINNER: &str = "晚餐";

/// Recommendation score thresholds (average daily weighted calories).
pub const SCORE_MEDIUM_MAX: f64 = 300.0;
pub const SCORE_HIGH_MAX: f64 = 500.0;

/// Defaults written into the settings row created alongside each user.
pub const DEFAULT_DAILY_GOAL: i64 = 30;
pub const DEFAULT_WEEKLY_GOAL: i64 = 3;
pub const DEFAULT_REMINDER_TIME: &str = "08:00";

pub const USER_LANDING_PAGE: &str = "recommendations";
pub const ADMIN_LANDING_PAGE: &str = "user_management";

/// Static weight each intensity level contributes to the 7-day score.
pub fn intensity_calories(intensity: &str) -> f64 {
    match intensity {
        "低" => 150.0,
        "中" => 300.0,
        "高" => 450.0,
        _ => 0.0,
    }
}

/// Food table keyed by (fitness goal, meal slot). Unknown goals fall back
/// to the 保持健康 bucket; the meal slot is always one of the three consts.
pub fn meal_foods(goal: &str, meal: &str) -> &'static [&'static str] {
    match (goal, meal) {
        ("减重", MEAL_BREAKFAST) => &["燕麦粥配蓝莓", "全麦面包配鸡蛋", "无糖豆浆配玉米"],
        ("减重", MEAL_LUNCH) => &["鸡胸肉沙拉", "清蒸鱼配糙米饭", "虾仁西兰花"],
        ("减重", MEAL_DINNER) => &["蔬菜豆腐汤", "凉拌鸡丝", "杂粮粥配时蔬"],
        ("增肌", MEAL_BREAKFAST) => &["牛奶燕麦加香蕉", "鸡蛋三明治", "希腊酸奶配坚果"],
        ("增肌", MEAL_LUNCH) => &["牛肉饭配蔬菜", "鸡胸肉意面", "三文鱼配土豆"],
        ("增肌", MEAL_DINNER) => &["牛排配红薯", "鸡腿肉糙米饭", "豆腐炒牛肉"],
        (_, MEAL_BREAKFAST) => &["小米粥配包子", "牛奶麦片", "鸡蛋灌饼"],
        (_, MEAL_LUNCH) => &["番茄炒蛋盖饭", "清炒时蔬配米饭", "冬瓜排骨汤面"],
        _ => &["家常豆腐配米饭", "蒸南瓜配杂粮", "青菜瘦肉粥"],
    }
}

pub fn admin_username() -> String {
    env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string())
}

pub fn admin_password() -> String {
    env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin888".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_goal_falls_back_to_maintain_health_bucket() {
        let fallback = meal_foods("提高耐力", MEAL_LUNCH);
        assert_eq!(fallback, meal_foods(DEFAULT_FOOD_GOAL, MEAL_LUNCH));
        assert!(!fallback.is_empty());
    }

    #[test]
    fn every_goal_and_meal_has_foods() {
        for goal in FITNESS_GOALS {
            for meal in [MEAL_BREAKFAST, MEAL_LUNCH, MEAL_DINNER] {
                assert!(!meal_foods(goal, meal).is_empty());
            }
        }
    }

    #[test]
    fn intensity_weights_are_ordered() {
        assert!(intensity_calories("低") < intensity_calories("中"));
        assert!(intensity_calories("中") < intensity_calories("高"));
        assert_eq!(intensity_calories("unknown"), 0.0);
    }
}
