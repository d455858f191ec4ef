//! HTML pages. Every piece of resume or job text passes through `html_escape`.

use axum::http::StatusCode;

use crate::models::job::JobPosting;

use super::ResumeResults;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }}
.card {{ border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }}
.error {{ background: #fef2f2; border-left: 3px solid #dc2626; padding: 0.75rem 1rem; margin-bottom: 1rem; }}
.score {{ float: right; font-weight: 700; color: #2563eb; }}
.tag {{ display: inline-block; background: #eff6ff; border-radius: 4px; padding: 0.1rem 0.5rem; margin: 0.1rem; }}
th {{ text-align: left; padding-right: 1rem; vertical-align: top; }}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

/// Upload form, optionally with the reason the last upload was refused.
pub fn index_page(error: Option<&str>) -> String {
    let notice = error
        .map(|msg| format!(r#"<div class="error">{}</div>"#, html_escape(msg)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Resume Job Matcher</h1>
{notice}
<form method="post" action="/" enctype="multipart/form-data" class="card">
<p>Upload a resume (PDF, DOCX or TXT) to see matching jobs.</p>
<input type="file" name="resume" accept=".pdf,.docx,.txt">
<button type="submit">Match jobs</button>
</form>"#
    );
    layout("Resume Job Matcher", &body)
}

pub fn results_page(results: &ResumeResults) -> String {
    let resume = &results.resume;
    let or_dash = |v: &Option<String>| html_escape(v.as_deref().unwrap_or("-"));

    let skills = if resume.skills.is_empty() {
        "<p>No skills recognized.</p>".to_string()
    } else {
        resume
            .skills
            .iter()
            .map(|s| format!(r#"<span class="tag">{}</span>"#, html_escape(s)))
            .collect::<String>()
    };
    let education = list(resume.education.iter().map(|e| html_escape(e)));
    let experience = list(resume.experience.iter().map(|e| match &e.duration {
        Some(d) => format!("{} ({})", html_escape(&e.organization), html_escape(d)),
        None => html_escape(&e.organization),
    }));

    let jobs = results
        .matches
        .iter()
        .map(|m| {
            format!(
                r#"<div class="card"><span class="score">{score:.1}%</span><h3><a href="/job/{id}">{title}</a></h3><p>{description}</p><p><strong>Required skills:</strong> {skills}</p></div>"#,
                score = m.score * 100.0,
                id = urlencoding::encode(&m.job.id),
                title = html_escape(&m.job.title()),
                description = html_escape(&m.job.description),
                skills = html_escape(&m.job.required_skills),
            )
        })
        .collect::<String>();

    let body = format!(
        r#"<h1>Your Results</h1>
<div class="card">
<h2>{name}</h2>
<p>Email: {email}<br>Phone: {phone}</p>
<h3>Skills</h3>
{skills}
<h3>Education</h3>
{education}
<h3>Experience</h3>
{experience}
</div>
<h2>{count} Matching Jobs</h2>
{jobs}
<p><a href="/">Upload another resume</a></p>"#,
        name = or_dash(&resume.name),
        email = or_dash(&resume.email),
        phone = or_dash(&resume.phone),
        count = results.match_count,
    );
    layout("Your Results", &body)
}

/// One job, column by column in table order.
pub fn job_page(job: &JobPosting, columns: &[String]) -> String {
    let rows = columns
        .iter()
        .filter_map(|c| job.field(c).map(|v| (c, v)))
        .map(|(c, v)| format!("<tr><th>{}</th><td>{}</td></tr>", html_escape(c), html_escape(v)))
        .collect::<String>();
    let body = format!(
        r#"<h1>{title}</h1>
<table class="card">{rows}</table>
<p><a href="/">Back</a></p>"#,
        title = html_escape(&job.title()),
    );
    layout(&job.title(), &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{status}</h1>
<div class="error">{message}</div>
<p><a href="/">Back</a></p>"#,
        status = html_escape(&status.to_string()),
        message = html_escape(message),
    );
    layout(&status.to_string(), &body)
}

fn list(items: impl Iterator<Item = String>) -> String {
    let items: String = items.map(|i| format!("<li>{i}</li>")).collect();
    if items.is_empty() {
        "<p>None found.</p>".to_string()
    } else {
        format!("<ul>{items}</ul>")
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::models::job::JobMatch;
    use crate::models::resume::ResumeRecord;

    #[test]
    fn test_escape() {
        assert_eq!(html_escape(r#"<b a="x">R&D's</b>"#), "&lt;b a=&quot;x&quot;&gt;R&amp;D&#39;s&lt;/b&gt;");
    }

    #[test]
    fn test_index_shows_escaped_error() {
        let page = index_page(Some("Unsupported file type '<exe>'"));
        assert!(page.contains("&lt;exe&gt;"));
        assert!(page.contains(r#"name="resume""#));
    }

    #[test]
    fn test_job_links_encode_the_id() {
        let job = JobPosting {
            id: "a/b c?".into(),
            description: "Ship it".into(),
            required_skills: "Rust".into(),
            attributes: BTreeMap::from([("title".to_string(), "Engineer".to_string())]),
        };
        let results = ResumeResults {
            resume: ResumeRecord::default(),
            matches: vec![JobMatch { job, score: 0.5 }],
            match_count: 1,
            parsed_at: chrono::Utc::now(),
        };
        let page = results_page(&results);
        assert!(page.contains(r#"<a href="/job/a%2Fb%20c%3F">Engineer</a>"#));
    }

    #[test]
    fn test_job_page_lists_columns_in_order() {
        let job = JobPosting {
            id: "3".into(),
            description: "Train <models>".into(),
            required_skills: "Python".into(),
            attributes: BTreeMap::from([("title".to_string(), "ML Engineer".to_string())]),
        };
        let columns = ["id", "title", "description", "required_skills"].map(String::from);
        let page = job_page(&job, &columns);
        assert!(page.contains("Train &lt;models&gt;"));
        let title_at = page.find("<th>title</th>").unwrap();
        let description_at = page.find("<th>description</th>").unwrap();
        assert!(title_at < description_at);
    }
}
