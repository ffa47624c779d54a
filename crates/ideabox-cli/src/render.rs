//! Plain-text formatting for command output.

use ideabox_core::{
  identity::Identity,
  stats::Stats,
  suggestion::{Suggestion, SuggestionStatus},
};

fn author(s: &Suggestion) -> String {
  match (&s.author_name, &s.author_email) {
    (Some(name), Some(email)) if name != email => format!("{name} <{email}>"),
    (Some(name), _) => name.clone(),
    (None, Some(email)) => email.clone(),
    (None, None) => "anonymous".to_string(),
  }
}

/// `<id>  [status]  title (author)`
pub fn summary_line(s: &Suggestion) -> String {
  format!(
    "{}  [{:<11}]  {} ({})",
    s.id,
    s.status.as_str(),
    s.title,
    author(s)
  )
}

pub fn detail(s: &Suggestion) -> String {
  format!(
    "{}\n  id:        {}\n  status:    {}\n  author:    {}\n  submitted: {}\n\n{}\n",
    s.title,
    s.id,
    s.status,
    author(s),
    s.created_at.format("%Y-%m-%d %H:%M UTC"),
    s.description
  )
}

pub fn stats(stats: &Stats) -> String {
  let mut out = format!("{:<12} {}\n", "all", stats.all);
  for status in SuggestionStatus::ALL {
    out.push_str(&format!("{:<12} {}\n", status.as_str(), stats.count(status)));
  }
  out
}

pub fn identity(identity: &Identity) -> String {
  match (&identity.name, &identity.email) {
    (Some(name), Some(email)) => format!("{} ({name} <{email}>)", identity.username),
    (Some(name), None) => format!("{} ({name})", identity.username),
    (None, Some(email)) => format!("{} <{email}>", identity.username),
    (None, None) => identity.username.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use uuid::Uuid;

  fn suggestion(name: Option<&str>, email: Option<&str>) -> Suggestion {
    Suggestion {
      id:           Uuid::nil(),
      created_at:   Utc::now(),
      title:        "Add dark mode".into(),
      description:  "Please add a dark theme".into(),
      status:       SuggestionStatus::Reviewed,
      author_name:  name.map(str::to_owned),
      author_email: email.map(str::to_owned),
    }
  }

  #[test]
  fn anonymous_author() {
    assert!(summary_line(&suggestion(None, None)).ends_with("(anonymous)"));
  }

  #[test]
  fn name_defaulted_from_email_is_not_repeated() {
    let s = suggestion(Some("ava@example.com"), Some("ava@example.com"));
    assert!(summary_line(&s).ends_with("(ava@example.com)"));
  }

  #[test]
  fn stats_lists_every_status() {
    let mut st = Stats::default();
    st.record(SuggestionStatus::Pending);
    let out = stats(&st);
    for status in SuggestionStatus::ALL {
      assert!(out.contains(status.as_str()));
    }
    assert!(out.starts_with("all          1"));
  }
}
