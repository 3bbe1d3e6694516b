use std::fmt;

use services::{ActivitySnapshot, Control, HomeSnapshot, Phase};
use shapeville_core::catalog::{self, COMPOSITE_FIGURES, SECTORS};
use shapeville_core::model::{ActivityKind, Dimension, SessionSummary};

const COMMAND_HINTS: [(Control, &str); 5] = [
    (Control::Submit, "answer <value>"),
    (Control::ChooseAngle, "angle <degrees>"),
    (Control::Reveal, "reveal"),
    (Control::Next, "next"),
    (Control::Start, "start <choice>"),
];

pub fn home(home: &HomeSnapshot) -> String {
    HomeView(home).to_string()
}

pub fn activity(snapshot: &ActivitySnapshot) -> String {
    ActivityView(snapshot).to_string()
}

pub fn summary(summary: &SessionSummary) -> String {
    SummaryView(summary).to_string()
}

pub fn catalog() -> String {
    CatalogView.to_string()
}

struct HomeView<'a>(&'a HomeSnapshot);

impl fmt::Display for HomeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let home = self.0;
        writeln!(f, "Score: {}   Progress: {}%", home.score, home.progress_percent)?;
        for tile in &home.tiles {
            let mark = if tile.completed { "x" } else { " " };
            let bonus = if tile.is_bonus { " (bonus)" } else { "" };
            writeln!(f, "  [{mark}] {}{bonus}", tile.title)?;
        }
        f.write_str("Type `open <activity>` to begin, `help` for commands.")
    }
}

struct ActivityView<'a>(&'a ActivitySnapshot);

impl fmt::Display for ActivityView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        writeln!(
            f,
            "== {} ({}/{} done) ==",
            snapshot.title,
            snapshot.completed_items.len().min(snapshot.required),
            snapshot.required
        )?;

        match snapshot.phase {
            Phase::Idle | Phase::Selecting => {
                writeln!(f, "Choose: {}", selection_hint(snapshot))?;
            }
            Phase::InProgress | Phase::Settled(_) => {
                if let Some(prompt) = &snapshot.prompt {
                    writeln!(f, "{prompt}")?;
                }
                if let Some(key) = &snapshot.asset_key {
                    writeln!(f, "  [image: {key}]")?;
                }
            }
        }

        if snapshot.phase == Phase::InProgress {
            writeln!(
                f,
                "Attempts left: {}   Time left: {}",
                snapshot.attempts_remaining.unwrap_or(0),
                clock_text(snapshot.remaining_seconds.unwrap_or(0))
            )?;
        }
        if let Some(feedback) = &snapshot.feedback {
            writeln!(f, "> {}", feedback.message)?;
        }
        if let Some(solution) = &snapshot.solution {
            writeln!(f, "Solution: {solution}")?;
        }

        let mut available: Vec<&str> = COMMAND_HINTS
            .iter()
            .filter(|(control, _)| snapshot.controls.allows(*control))
            .map(|(_, hint)| *hint)
            .collect();
        available.push("back");
        f.write_str(&available.join(" | "))
    }
}

struct SummaryView<'a>(&'a SessionSummary);

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Session complete!")?;
        writeln!(f, "Final score: {}", summary.score)?;
        writeln!(f, "Progress: {}%", summary.progress_percent)?;
        writeln!(
            f,
            "Correct: {}   Out of attempts: {}   Timed out: {}",
            summary.correct, summary.exhausted, summary.expired
        )?;
        let minutes = (summary.ended_at - summary.started_at).num_minutes();
        write!(f, "Time spent: {minutes} min")
    }
}

struct CatalogView;

impl fmt::Display for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dimension in [Dimension::Two, Dimension::Three] {
            let names: Vec<&str> = catalog::shapes_of(dimension).map(|entry| entry.name).collect();
            writeln!(f, "{} shapes: {}", dimension.label(), names.join(", "))?;
        }
        writeln!(f, "Composite figures:")?;
        for figure in &COMPOSITE_FIGURES {
            writeln!(f, "  {}: {} (area {:.2})", figure.id, figure.description, figure.area())?;
        }
        writeln!(f, "Sectors:")?;
        for sector in &SECTORS {
            writeln!(
                f,
                "  {}: r = {:.1}, θ = {:.0}° (area {:.2})",
                sector.id,
                sector.radius,
                sector.angle_degrees,
                sector.area()
            )?;
        }
        Ok(())
    }
}

fn selection_hint(snapshot: &ActivitySnapshot) -> String {
    match snapshot.activity {
        ActivityKind::ShapeRecognition => "start 2d | start 3d".to_string(),
        ActivityKind::AngleClassification => "start".to_string(),
        _ => {
            let open: Vec<&str> = snapshot
                .controls
                .items
                .iter()
                .filter(|choice| choice.enabled)
                .map(|choice| choice.item.as_str())
                .collect();
            format!("start <{}> or start random", open.join("|"))
        }
    }
}

fn clock_text(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_text_pads_minutes_and_seconds() {
        assert_eq!(clock_text(180), "03:00");
        assert_eq!(clock_text(65), "01:05");
        assert_eq!(clock_text(0), "00:00");
    }

    #[test]
    fn activity_lists_only_enabled_commands() {
        use services::{ActivityIntent, AlwaysConfirm, Tutor};
        use shapeville_core::model::{ActivityMode, PolygonFamily, TutorSettings};
        use shapeville_core::time::fixed_clock;

        let mut tutor = Tutor::new(TutorSettings::default().with_seed(3), fixed_clock());
        tutor.open(ActivityKind::PolygonArea, &AlwaysConfirm).unwrap();
        tutor
            .dispatch(ActivityIntent::Start(ActivityMode::Polygon(Some(
                PolygonFamily::Rectangle,
            ))))
            .unwrap();

        let text = activity(&tutor.activity_snapshot().unwrap());
        assert!(text.contains("Time left: 03:00"));
        assert!(text.ends_with("answer <value> | back"));
    }

    #[test]
    fn catalog_lists_every_sector() {
        let text = catalog();
        assert!(text.contains("1: r = 8.0, θ = 90° (area 50.24)"));
        assert!(text.contains("2D shapes: circle"));
    }
}
