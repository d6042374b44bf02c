//! # 通知模板
//!
//! 主题不做 HTML 转义，正文开启自动转义

use tera::{Context, Tera};

use super::senders::NotifyError;

/// 宕机通知主题
pub const DOWN_SUBJECT: &str = "🔴 {{ name }} is {{ status }}";

/// 宕机通知正文
pub const DOWN_HTML: &str = r#"<div style="font-family: sans-serif;">
  <h2 style="color: #dc2626;">{{ name }} is {{ status }}</h2>
  <p>We detected a problem with <a href="{{ url }}">{{ url }}</a>.</p>
  <table>
    <tr><td><strong>Cause</strong></td><td>{{ cause }}</td></tr>
    {% if error_message %}<tr><td><strong>Details</strong></td><td>{{ error_message }}</td></tr>{% endif %}
    <tr><td><strong>Detected at</strong></td><td>{{ occurred_at }} UTC</td></tr>
  </table>
  <p>We will let you know when it recovers.</p>
</div>"#;

/// 恢复通知主题
pub const RECOVERY_SUBJECT: &str = "✅ {{ name }} is back up";

/// 恢复通知正文
pub const RECOVERY_HTML: &str = r#"<div style="font-family: sans-serif;">
  <h2 style="color: #16a34a;">{{ name }} is back up</h2>
  <p><a href="{{ url }}">{{ url }}</a> is responding normally again.</p>
  <table>
    <tr><td><strong>Downtime</strong></td><td>{{ downtime }}</td></tr>
    <tr><td><strong>Recovered at</strong></td><td>{{ occurred_at }} UTC</td></tr>
  </table>
</div>"#;

/// 渲染单个模板
pub fn render(template: &str, context: &Context, autoescape: bool) -> Result<String, NotifyError> {
    Tera::one_off(template, context, autoescape).map_err(|e| NotifyError::Template(e.to_string()))
}
