//! 描述拼装
//!
//! 把提交人、来源页面等信息拼成 markdown 头部，后面接用户原文

use crate::models::feedback::FeedbackSubmission;

/// 生成工作项描述
///
/// 有元信息时输出：
///
/// ```text
/// ## Feedback Information
///
/// **User:** A (a@x.com)
/// **User ID:** 7
/// **URL:** http://u
/// **User Agent:** UA
/// **Timestamp:** 2024-01-01 00:00:00
///
/// ---
///
/// ## Description
///
/// <原文>
/// ```
///
/// 缺失（或空白）的字段不输出；全部缺失时只返回原文。
pub fn format_description(submission: &FeedbackSubmission) -> String {
    let info = metadata_lines(submission);
    if info.is_empty() {
        return submission.description.clone();
    }

    format!(
        "## Feedback Information\n\n{}\n\n---\n\n## Description\n\n{}",
        info.join("\n"),
        submission.description
    )
}

fn metadata_lines(submission: &FeedbackSubmission) -> Vec<String> {
    let mut info = Vec::new();

    if let Some(submitter) = &submission.submitter {
        let name = present(submitter.name.as_deref());
        let email = present(submitter.email.as_deref());
        match (name, email) {
            (Some(name), Some(email)) => info.push(format!("**User:** {} ({})", name, email)),
            (Some(only), None) | (None, Some(only)) => info.push(format!("**User:** {}", only)),
            (None, None) => {}
        }
        if let Some(id) = present(submitter.id.as_deref()) {
            info.push(format!("**User ID:** {}", id));
        }
    }

    let fields = [
        ("URL", submission.url.as_deref()),
        ("User Agent", submission.user_agent.as_deref()),
        ("Timestamp", submission.timestamp.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = present(value) {
            info.push(format!("**{}:** {}", label, value));
        }
    }

    info
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
