//! Plain-text rendering of the dashboard view model.
use std::fmt::Write as _;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use jobdesk_client::ClientSettings;
use jobdesk_core::{
    AppViewModel, ApplicationStatus, ApplyControl, ApplyReceipt, ArtifactLinks, DraftRecord,
    HealthReport, JobCardView, NavBadgeView, TailorDialogView,
};

const ABSENT: &str = "—";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn status_pill(status: &ApplicationStatus) -> String {
    format!("[{}]", status.label())
}

/// "Applications" with the running count and a pulse dot while work is active.
pub fn nav_badge(badge: &NavBadgeView) -> String {
    if badge.running == 0 {
        return "Applications".to_string();
    }
    let pulse = if badge.pulse { " ●" } else { "" };
    format!("Applications [{}]{pulse}", badge.running)
}

pub fn format_timestamp(raw: Option<&str>) -> String {
    format_timestamp_in(raw, &Local)
}

/// Naive timestamps are taken as UTC, which is what the backend stores.
fn format_timestamp_in<Tz>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return ABSENT.to_string();
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.and_utc())
        });
    match parsed {
        Ok(dt) => dt.with_timezone(tz).format(TIME_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

pub struct Renderer {
    base_url: String,
}

impl Renderer {
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn applications(&self, view: &AppViewModel) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} · {} tracked{}",
            nav_badge(&view.badge),
            view.application_count,
            if view.poll_loading { " · refreshing" } else { "" }
        );
        if let Some(error) = &view.poll_error {
            let _ = writeln!(out, "! {error}");
        }
        if view.applications.is_empty() {
            out.push_str("No applications yet.\n");
            return out;
        }

        let header = ["Company", "Title", "Portal", "Status", "Updated", "Links"];
        let rows = view
            .applications
            .iter()
            .map(|row| {
                [
                    row.company.clone().unwrap_or_else(|| ABSENT.into()),
                    row.title.clone().unwrap_or_else(|| ABSENT.into()),
                    row.portal.clone().unwrap_or_else(|| ABSENT.into()),
                    status_pill(&row.status),
                    format_timestamp(row.updated_at.as_deref()),
                    self.links(&row.links),
                ]
            })
            .collect::<Vec<_>>();
        out.push_str(&table(&header, rows.as_slice()));
        out
    }

    pub fn job_cards(&self, view: &AppViewModel) -> String {
        let mut out = String::new();
        if let Some(error) = &view.error {
            let _ = writeln!(out, "! {error}");
        }
        let _ = writeln!(
            out,
            "Found {} job(s) at {}%+ fit",
            view.found_count, view.filters.min_score
        );
        for card in &view.jobs {
            out.push_str(&job_card(card));
        }
        out
    }

    pub fn tailor(&self, dialog: &TailorDialogView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Tailored for {}", dialog.company);
        let Some(result) = &dialog.result else {
            out.push_str("(no result)\n");
            return out;
        };
        if let Some(score) = result.ats_score {
            let _ = writeln!(out, "ATS score: {score}");
        }
        if let Some(summary) = &result.summary {
            let _ = writeln!(out, "\n{summary}");
        }
        out.push_str("\nBullets:\n");
        for bullet in &result.revised_bullets {
            let _ = writeln!(out, "  - {bullet}");
        }
        let _ = writeln!(out, "\nCover letter:\n{}", result.cover_letter);
        for (label, link) in [
            ("Resume", &result.resume_docx_url),
            ("Cover letter", &result.cover_letter_url),
        ] {
            if let Some(link) = link {
                let _ = writeln!(out, "{label}: {}", self.absolute(link));
            }
        }
        out
    }

    pub fn drafts(&self, view: &AppViewModel) -> String {
        let mut out = String::new();
        if let Some(error) = &view.drafts_error {
            let _ = writeln!(out, "! {error}");
        }
        if view.drafts.is_empty() {
            out.push_str("No drafts.\n");
            return out;
        }
        let header = ["Id", "Company", "Title", "Status", "Created", "Links"];
        let rows = view
            .drafts
            .iter()
            .map(|draft| self.draft_row(draft))
            .collect::<Vec<_>>();
        out.push_str(&table(&header, rows.as_slice()));
        out
    }

    pub fn receipt(&self, receipt: &ApplyReceipt) -> String {
        let ids = receipt
            .application_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        format!("Queued application(s): {}\n", ids.join(", "))
    }

    pub fn health(&self, report: &HealthReport) -> String {
        format!(
            "{}: {}\nGreenhouse boards: {}\nLever companies: {}\n",
            self.base_url,
            report.status,
            list_or_absent(&report.gh_boards),
            list_or_absent(&report.lever_companies)
        )
    }

    fn draft_row(&self, draft: &DraftRecord) -> [String; 6] {
        let created = match &draft.created_at {
            Some(serde_json::Value::String(text)) => format_timestamp(Some(text)),
            Some(serde_json::Value::Number(secs)) => secs
                .as_i64()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(|dt| dt.with_timezone(&Local).format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| secs.to_string()),
            _ => ABSENT.to_string(),
        };
        let links = ArtifactLinks {
            screenshot_url: draft.screenshot_url.clone(),
            snapshot_url: draft.snapshot_url.clone(),
        };
        [
            draft.id.to_string(),
            draft.company.clone().unwrap_or_else(|| ABSENT.into()),
            draft.title.clone().unwrap_or_else(|| ABSENT.into()),
            draft.status.clone().unwrap_or_else(|| ABSENT.into()),
            created,
            self.links(&links),
        ]
    }

    fn links(&self, links: &ArtifactLinks) -> String {
        let parts = [
            ("screenshot", &links.screenshot_url),
            ("snapshot", &links.snapshot_url),
        ]
        .into_iter()
        .filter_map(|(label, link)| {
            link.as_ref()
                .map(|link| format!("{label}: {}", self.absolute(link)))
        })
        .collect::<Vec<_>>();
        if parts.is_empty() {
            ABSENT.to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Backend file links are usually server-relative.
    fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        }
    }
}

fn job_card(card: &JobCardView) -> String {
    let job = &card.job;
    let control = match &card.control {
        ApplyControl::StatusPill(status) => status_pill(status),
        ApplyControl::Apply { busy: true } => "[Applying…]".to_string(),
        ApplyControl::Apply { busy: false } => "[Apply]".to_string(),
    };
    let mut out = format!(
        "\n{} — {}\n  {} · {} · fit {}%  {}\n  {}\n",
        job.title,
        job.company,
        job.location.as_deref().unwrap_or(ABSENT),
        job.source.as_deref().unwrap_or(ABSENT),
        card.fit_percent,
        control,
        job.url
    );
    if let Some(error) = &card.apply_error {
        let _ = writeln!(out, "  ! {error}");
    }
    out
}

fn list_or_absent(items: &[String]) -> String {
    if items.is_empty() {
        ABSENT.to_string()
    } else {
        items.join(", ")
    }
}

fn table<const N: usize>(header: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths = (*header).map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().copied(), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
