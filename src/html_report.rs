//! HTML dashboard: chart, recommended schedule and weekly report on one page
//!
//! Read-only view of the same aggregates the CLI prints.

use crate::aggregate::{ScheduleEntry, WeeklySummary};
use crate::chart::escape_markup;
use crate::observation::DATE_FORMAT;
use crate::output::{busiest_line, weakest_line, NOT_ENOUGH_DATA};

/// HTML dashboard builder
#[derive(Debug)]
pub struct HtmlDashboard {
    title: String,
}

impl Default for HtmlDashboard {
    fn default() -> Self {
        Self::new("Otimizador de Turnos")
    }
}

impl HtmlDashboard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px auto;
            max-width: 1040px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        h1 {
            color: #6c3483;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #9b59b6;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        td.number {
            font-family: monospace;
            text-align: right;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .insight {
            background-color: #fff;
            border-left: 4px solid #9b59b6;
            padding: 8px 12px;
            margin: 6px 0;
        }
        .empty {
            color: #888;
            font-style: italic;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn render_entries(entries: &[ScheduleEntry], staff_header: &str) -> String {
        let mut html = String::new();
        html.push_str("    <table>\n");
        html.push_str(&format!(
            "        <tr><th>Dia da semana</th><th>Turno</th><th>Média de pessoas</th><th>{}</th></tr>\n",
            escape_markup(staff_header)
        ));
        for entry in entries {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td class=\"number\">{:.1}</td><td class=\"number\">{}</td></tr>\n",
                escape_markup(entry.weekday.label()),
                escape_markup(entry.shift.label()),
                entry.average_headcount,
                entry.recommended_staff
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_summary(summary: &WeeklySummary) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "    <h2>Relatório Semanal de Movimento ({} a {})</h2>\n",
            summary.week_start.format(DATE_FORMAT),
            summary.week_end.format(DATE_FORMAT)
        ));

        if summary.is_empty() {
            html.push_str(&format!(
                "    <p class=\"empty\">{}</p>\n",
                escape_markup(NOT_ENOUGH_DATA)
            ));
            return html;
        }

        html.push_str(&Self::render_entries(
            &summary.entries,
            "Funcionários recomendados",
        ));
        for line in [busiest_line(summary), weakest_line(summary)]
            .into_iter()
            .flatten()
        {
            html.push_str(&format!(
                "    <div class=\"insight\">{}</div>\n",
                escape_markup(&line)
            ));
        }
        html
    }

    /// Generate complete HTML document
    pub fn to_html(
        &self,
        chart_svg: &str,
        schedule: &[ScheduleEntry],
        summary: &WeeklySummary,
    ) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"pt-BR\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>{}</title>\n",
            escape_markup(&self.title)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", escape_markup(&self.title)));

        html.push_str("    <h2>Gráfico de Média por Turno</h2>\n");
        html.push_str("    <div class=\"chart\">\n");
        html.push_str(chart_svg);
        html.push_str("    </div>\n");

        html.push_str("    <h2>Escala Recomendada de Funcionários</h2>\n");
        if schedule.is_empty() {
            html.push_str("    <p class=\"empty\">Nenhum dado registrado ainda.</p>\n");
        } else {
            html.push_str(&Self::render_entries(schedule, "Funcionários necessários"));
        }

        html.push_str(&Self::render_summary(summary));

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Gerado por escala {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{schedule, weekly_summary};
    use crate::chart::render_chart;
    use crate::observation::{Observation, Shift};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_dashboard_basic_structure() {
        let summary = weekly_summary(&[], date(11));
        let html = HtmlDashboard::default().to_html(&render_chart(&[]), &[], &summary);

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Nenhum dado registrado ainda."));
        assert!(html.contains(NOT_ENOUGH_DATA));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn test_dashboard_with_data() {
        let observations = vec![
            Observation::new(date(3), Shift::Morning, 80),
            Observation::new(date(4), Shift::Evening, 20),
        ];
        let entries = schedule(&observations);
        let summary = weekly_summary(&observations, date(11));
        let html = HtmlDashboard::default().to_html(&render_chart(&observations), &entries, &summary);

        assert!(html.contains("<td>terça-feira</td><td>Manhã</td>"));
        assert!(html.contains("Turno mais movimentado: terça-feira - Manhã"));
        assert!(html.contains("Dia mais fraco da semana: segunda-feira"));
        assert!(html.contains("2025-06-02 a 2025-06-08"));
    }

    #[test]
    fn test_dashboard_escapes_title() {
        let summary = weekly_summary(&[], date(11));
        let html = HtmlDashboard::new("<script>x</script>").to_html("", &[], &summary);
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;x"));
    }
}
