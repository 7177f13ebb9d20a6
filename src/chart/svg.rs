use super::interact::{RevealSchedule, REVEAL_DURATION_MS};
use super::layout::Chart;
use std::fmt::Write;

/// Hatch spacing per intensity level; denser lines for busier days.
const HATCH_SPACING: [f64; 6] = [12.0, 8.0, 5.0, 3.5, 2.5, 1.5];

const STYLE: &str = r#"
.activity-commits__label { font-family: var(--font-family-mono, monospace); }
.activity-commits__year-label { font-size: 10px; fill: var(--section-primary, #222); }
.activity-commits__month-label, .activity-commits__day-label { font-size: 9px; fill: var(--text-muted, #888); }
.activity-commits__year-separator { fill: none; stroke: var(--body-color, #222); stroke-width: 1; stroke-linejoin: round; stroke-linecap: round; opacity: 0.8; }
.activity-commits__cell { stroke-width: 1; }
.activity-commits__cell--active { stroke: var(--section-primary, #222); }
.activity-commits__cell--empty { stroke: var(--border-dashed, #bbb); stroke-dasharray: 2,2; fill: transparent; }
.activity-commits__cell--reveal { transform-box: fill-box; transform-origin: center; animation-name: activity-commits-reveal; animation-timing-function: cubic-bezier(0.34, 1.56, 0.64, 1); animation-fill-mode: both; }
@keyframes activity-commits-reveal { from { opacity: 0; transform: scale(0); } to { opacity: 1; transform: scale(1); } }
@media (prefers-reduced-motion: reduce) { .activity-commits__cell--reveal { animation: none; } }
"#;

fn hatch_spacing(level: u8) -> f64 {
    let i = usize::from(level.max(1) - 1).min(HATCH_SPACING.len() - 1);
    HATCH_SPACING[i]
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone SVG document for the heatmap.
///
/// Tooltips are `<title>` children so any SVG viewer shows them on hover.
/// The reveal animation is pure CSS and switches off under
/// `prefers-reduced-motion`.
pub fn render_svg(chart: &Chart, reveal: &RevealSchedule) -> String {
    let mut out = String::new();
    let config = &chart.config;

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="activity-commits" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = chart.width,
        h = chart.height,
    );
    let _ = writeln!(out, "<style>{STYLE}</style>");

    out.push_str("<defs>\n");
    for level in 1..=config.levels.max(1) {
        let spacing = hatch_spacing(level);
        let _ = writeln!(
            out,
            r#"<pattern id="hatch-{level}" patternUnits="userSpaceOnUse" width="{spacing}" height="{spacing}" patternTransform="rotate(45)"><line x1="0" y1="0" x2="0" y2="{spacing}" stroke="var(--section-primary, #222)" stroke-width="1"/></pattern>"#
        );
    }
    out.push_str("</defs>\n");

    for label in &chart.year_labels {
        let _ = writeln!(
            out,
            r#"<text class="activity-commits__label activity-commits__year-label" x="{}" y="{}">{}</text>"#,
            label.x,
            label.y,
            escape(&label.text)
        );
    }
    for label in &chart.month_labels {
        let _ = writeln!(
            out,
            r#"<text class="activity-commits__label activity-commits__month-label" x="{}" y="{}">{}</text>"#,
            label.x,
            label.y,
            escape(&label.text)
        );
    }
    for label in &chart.day_labels {
        let _ = writeln!(
            out,
            r#"<text class="activity-commits__label activity-commits__day-label" text-anchor="end" x="{}" y="{}">{}</text>"#,
            label.x,
            label.y,
            escape(&label.text)
        );
    }

    for path in &chart.separators {
        let _ = writeln!(out, r#"<path class="activity-commits__year-separator" d="{path}"/>"#);
    }

    for (i, cell) in chart.cells.iter().enumerate() {
        let (class, fill) = if cell.level == 0 {
            ("activity-commits__cell--empty", "transparent".to_string())
        } else {
            ("activity-commits__cell--active", format!("url(#hatch-{})", cell.level))
        };

        let animation = match reveal.step_for(i) {
            Some(step) if !step.is_instant() => format!(
                r#" activity-commits__cell--reveal" style="animation-delay: {}ms; animation-duration: {}ms"#,
                step.delay_ms, REVEAL_DURATION_MS
            ),
            _ => String::new(),
        };

        let _ = writeln!(
            out,
            r#"<rect class="activity-commits__cell {class}{animation}" x="{}" y="{}" width="{s}" height="{s}" rx="{r}" ry="{r}" fill="{fill}" data-date="{}" data-count="{}"><title>{}</title></rect>"#,
            cell.x,
            cell.y,
            cell.date.format("%Y-%m-%d"),
            cell.count,
            escape(&cell.tooltip),
            s = config.cell_size,
            r = config.cell_radius,
        );
    }

    out.push_str("</svg>\n");
    out
}
