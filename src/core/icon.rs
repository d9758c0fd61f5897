use crate::domain::identifiers::TaskType;

pub fn icon_url(base_url: &str, task_type: TaskType, color: &str) -> Option<String> {
    let base = base_url.trim();
    let color = color.trim();
    if base.is_empty() || color.is_empty() {
        return None;
    }

    // "#FF8800" -> "FF8800"
    let color_hex = color.strip_prefix('#').unwrap_or(color);
    Some(format!(
        "{}/api/notification-icon/{}/{}.png",
        base.strip_suffix('/').unwrap_or(base),
        task_type.as_str().to_lowercase(),
        color_hex
    ))
}
