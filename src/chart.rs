//! SVG bar chart of mean headcount per weekday and shift
//!
//! One group of bars per weekday (Monday first), one bar per shift, with the
//! rounded mean printed above each bar.

use crate::aggregate::{pivot, ShiftPivot};
use crate::observation::{Observation, Shift, Weekday};
use std::fmt::Write;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 120.0;
const TICKS: usize = 5;

const TITLE: &str = "Média de Pessoas por Dia e Turno da Semana";
const X_LABEL: &str = "Dia da Semana";
const Y_LABEL: &str = "Quantidade Média de Pessoas";
const LEGEND_TITLE: &str = "Turno";
const NO_DATA: &str = "Sem dados para exibir";

/// Bar colour per shift (purple, blue, red)
fn shift_color(shift: Shift) -> &'static str {
    match shift {
        Shift::Morning => "#9b59b6",
        Shift::Afternoon => "#3498db",
        Shift::Evening => "#e74c3c",
    }
}

/// Escape text for inclusion in SVG/HTML markup
pub(crate) fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Smallest "round" number (1, 2, 2.5, 5 × 10^n) not below `value`
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    for step in [1.0, 2.0, 2.5, 5.0, 10.0] {
        if step * magnitude >= value {
            return step * magnitude;
        }
    }
    10.0 * magnitude
}

fn open_svg(out: &mut String) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#);
}

/// Chart for an observation set; an empty set renders a placeholder
pub fn render_chart(observations: &[Observation]) -> String {
    if observations.is_empty() {
        return render_placeholder(NO_DATA);
    }
    render_pivot(&pivot(observations))
}

/// Centered message instead of bars
pub fn render_placeholder(message: &str) -> String {
    let mut out = String::new();
    open_svg(&mut out);
    let _ = writeln!(
        out,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="20">{}</text>"#,
        WIDTH / 2.0,
        HEIGHT / 2.0,
        escape_markup(message)
    );
    out.push_str("</svg>\n");
    out
}

/// Grouped bar chart of a weekday × shift table
pub fn render_pivot(table: &ShiftPivot) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let y_max = nice_ceiling(table.max());
    let group_w = plot_w / Weekday::ALL.len() as f64;
    let bar_w = group_w * 0.8 / Shift::ALL.len() as f64;

    let mut out = String::new();
    open_svg(&mut out);

    let _ = writeln!(
        out,
        r#"  <text x="{}" y="32" text-anchor="middle" font-size="18">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        escape_markup(TITLE)
    );

    // Horizontal grid with tick labels
    for tick in 0..=TICKS {
        let value = y_max * tick as f64 / TICKS as f64;
        let y = baseline - plot_h * tick as f64 / TICKS as f64;
        let _ = writeln!(
            out,
            r##"  <line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            y = y
        );
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(value)
        );
    }

    for day in Weekday::ALL {
        let group_x = MARGIN_LEFT + group_w * day.index() as f64 + group_w * 0.1;
        for shift in Shift::ALL {
            let value = table.get(day, shift);
            let h = plot_h * value / y_max;
            let x = group_x + bar_w * shift.index() as f64;
            let y = baseline - h;
            let _ = writeln!(
                out,
                r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{} - {}: {:.1}</title></rect>"#,
                x,
                y,
                bar_w,
                h,
                shift_color(shift),
                escape_markup(day.label()),
                escape_markup(shift.label()),
                value
            );
            let _ = writeln!(
                out,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="9">{:.0}</text>"#,
                x + bar_w / 2.0,
                y - 4.0,
                value
            );
        }

        let label_x = MARGIN_LEFT + group_w * (day.index() as f64 + 0.5);
        let label_y = baseline + 18.0;
        let _ = writeln!(
            out,
            r#"  <text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="12" transform="rotate(-45 {x:.1} {y:.1})">{label}</text>"#,
            x = label_x,
            y = label_y,
            label = escape_markup(day.label())
        );
    }

    // Axes
    let _ = writeln!(
        out,
        r#"  <line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{b:.1}" stroke="black"/>"#,
        x = MARGIN_LEFT,
        top = MARGIN_TOP,
        b = baseline
    );
    let _ = writeln!(
        out,
        r#"  <line x1="{x1:.1}" y1="{b:.1}" x2="{x2:.1}" y2="{b:.1}" stroke="black"/>"#,
        x1 = MARGIN_LEFT,
        x2 = MARGIN_LEFT + plot_w,
        b = baseline
    );
    let _ = writeln!(
        out,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 16.0,
        escape_markup(X_LABEL)
    );
    let _ = writeln!(
        out,
        r#"  <text x="20" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y:.1})">{label}</text>"#,
        y = MARGIN_TOP + plot_h / 2.0,
        label = escape_markup(Y_LABEL)
    );

    render_legend(&mut out, MARGIN_LEFT + plot_w + 20.0, MARGIN_TOP);

    out.push_str("</svg>\n");
    out
}

fn render_legend(out: &mut String, x: f64, y: f64) {
    let _ = writeln!(
        out,
        r#"  <text x="{:.1}" y="{:.1}" font-size="13" font-weight="bold">{}</text>"#,
        x,
        y + 12.0,
        LEGEND_TITLE
    );
    for shift in Shift::ALL {
        let row_y = y + 24.0 + 22.0 * shift.index() as f64;
        let _ = writeln!(
            out,
            r#"  <rect x="{:.1}" y="{:.1}" width="14" height="14" fill="{}"/>"#,
            x,
            row_y,
            shift_color(shift)
        );
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            x + 20.0,
            row_y + 12.0,
            escape_markup(shift.label())
        );
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
