//! Server-rendered HTML for the dashboard and the login form.
//!
//! The markup is assembled with `format!` and the charts are drawn
//! client-side by Chart.js from a CDN; the series are embedded as JSON
//! arrays in the page script.

use crate::schemas::DashboardData;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 0; background: #f4f5f7; color: #1f2430; }
    header { background: #1f2430; color: #fff; padding: 0.8rem 1.5rem; display: flex; justify-content: space-between; align-items: center; }
    header form { margin: 0; }
    main { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
    .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }
    .card { background: #fff; border-radius: 8px; padding: 1rem 1.2rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
    .card h3 { margin: 0 0 0.4rem; font-size: 0.8rem; text-transform: uppercase; color: #6b7280; }
    .card .value { font-size: 1.8rem; font-weight: 700; }
    .card .badge { font-size: 0.85rem; margin-left: 0.4rem; }
    .badge.up { color: #15803d; }
    .badge.down { color: #b91c1c; }
    .badge.na { color: #6b7280; }
    .filters { background: #fff; border-radius: 8px; padding: 1rem 1.2rem; margin: 1.2rem 0; box-shadow: 0 1px 3px rgba(0,0,0,0.08); display: flex; gap: 0.8rem; align-items: end; flex-wrap: wrap; }
    .filters label { display: flex; flex-direction: column; font-size: 0.8rem; color: #6b7280; gap: 0.2rem; }
    .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
    .chart { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
    .chart.wide { grid-column: 1 / -1; }
    button { background: #1f2430; color: #fff; border: none; border-radius: 6px; padding: 0.5rem 1rem; cursor: pointer; }
    a.clear { align-self: center; font-size: 0.9rem; }
    .login-box { max-width: 320px; margin: 6rem auto; background: #fff; border-radius: 8px; padding: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
    .login-box input { width: 100%; box-sizing: border-box; margin: 0.3rem 0 0.8rem; padding: 0.5rem; }
    .error { color: #b91c1c; font-size: 0.9rem; }
"#;

/// Render the full reporting page for a prepared [`DashboardData`].
pub fn render_dashboard(data: &DashboardData) -> String {
    let growth_badge = match data.summary.growth_percent {
        Some(growth) if growth >= 0.0 => {
            format!(r#"<span class="badge up">&#9650; {growth:.1}%</span>"#)
        }
        Some(growth) => format!(r#"<span class="badge down">&#9660; {growth:.1}%</span>"#),
        None => r#"<span class="badge na">N/A</span>"#.to_string(),
    };

    let year_options: String = data
        .available_years
        .iter()
        .map(|year| {
            let selected = if data.filter.year == Some(*year) {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{year}"{selected}>{year}</option>"#)
        })
        .collect();

    let date_from = data
        .filter
        .date_from
        .map(|d| d.to_string())
        .unwrap_or_default();
    let date_to = data
        .filter
        .date_to
        .map(|d| d.to_string())
        .unwrap_or_default();

    let year_labels = to_json(&data.orders_by_year.iter().map(|y| y.year).collect::<Vec<_>>());
    let year_values = to_json(&data.orders_by_year.iter().map(|y| y.count).collect::<Vec<_>>());
    let month_labels = to_json(
        &data
            .orders_by_month
            .iter()
            .map(|m| m.label.as_str())
            .collect::<Vec<_>>(),
    );
    let month_values = to_json(&data.orders_by_month.iter().map(|m| m.count).collect::<Vec<_>>());
    let type_labels = to_json(
        &data
            .orders_by_type
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>(),
    );
    let type_values = to_json(&data.orders_by_type.iter().map(|t| t.count).collect::<Vec<_>>());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Purchase Order Dashboard</title>
<script src="{CHART_JS_CDN}"></script>
<style>{STYLE}</style>
</head>
<body>
<header>
  <strong>Purchase Order Dashboard</strong>
  <form method="post" action="/logout"><button type="submit">Log out</button></form>
</header>
<main>
  <section class="cards">
    <div class="card"><h3>Total orders</h3><div class="value">{total}</div></div>
    <div class="card"><h3>Years covered</h3><div class="value">{years}</div></div>
    <div class="card"><h3>This month</h3><div class="value">{current}{growth_badge}</div></div>
    <div class="card"><h3>Avg orders / month</h3><div class="value">{average:.1}</div></div>
  </section>
  <form class="filters" method="get" action="/admin/dashboard">
    <label>Year
      <select name="year">
        <option value="">All years</option>
        {year_options}
      </select>
    </label>
    <label>From
      <input type="date" name="date_from" value="{date_from}">
    </label>
    <label>To
      <input type="date" name="date_to" value="{date_to}">
    </label>
    <button type="submit">Apply</button>
    <a class="clear" href="/admin/dashboard">Clear</a>
  </form>
  <section class="charts">
    <div class="chart wide"><canvas id="orders-by-month"></canvas></div>
    <div class="chart"><canvas id="orders-by-year"></canvas></div>
    <div class="chart"><canvas id="orders-by-type"></canvas></div>
  </section>
</main>
<script>
new Chart(document.getElementById('orders-by-year'), {{
  type: 'bar',
  data: {{
    labels: {year_labels},
    datasets: [{{ label: 'Orders per year', data: {year_values}, backgroundColor: '#3b82f6' }}]
  }}
}});
new Chart(document.getElementById('orders-by-month'), {{
  type: 'line',
  data: {{
    labels: {month_labels},
    datasets: [{{ label: 'Orders, last 12 months', data: {month_values}, borderColor: '#1f2430', tension: 0.2, fill: false }}]
  }}
}});
new Chart(document.getElementById('orders-by-type'), {{
  type: 'doughnut',
  data: {{
    labels: {type_labels},
    datasets: [{{ label: 'Top order types', data: {type_values} }}]
  }}
}});
</script>
</body>
</html>"#,
        total = data.summary.total_orders,
        years = data.summary.years_covered,
        current = data.summary.current_month_count,
        average = data.summary.average_per_month,
    )
}

/// Render the login form, optionally with an error message.
pub fn render_login(error: Option<&str>) -> String {
    let error_html = error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Log in</title>
<style>{STYLE}</style>
</head>
<body>
<div class="login-box">
  <h2>Log in</h2>
  {error_html}
  <form method="post" action="/login">
    <label>Username
      <input type="text" name="username" required autofocus>
    </label>
    <label>Password
      <input type="password" name="password" required>
    </label>
    <button type="submit">Log in</button>
  </form>
</div>
</body>
</html>"#
    )
}

/// Serialize a series for embedding in the page script. Serialization of
/// plain numbers and strings cannot fail; the fallback keeps the page
/// rendering even if that assumption is ever broken.
///
/// `<`, `>` and `&` are emitted as unicode escapes: order-type labels come
/// from imported data, and a literal `</script>` inside a JSON string
/// would otherwise terminate the script element.
fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use report::{MonthCount, SummaryMetrics, TypeCount, YearCount};

    use super::*;
    use crate::schemas::{ActiveFilter, DashboardData};

    fn sample_data() -> DashboardData {
        DashboardData {
            summary: SummaryMetrics {
                total_orders: 25,
                years_covered: 2,
                current_month_count: 15,
                previous_month_count: 10,
                growth_percent: Some(50.0),
                average_per_month: 12.5,
            },
            orders_by_year: vec![YearCount { year: 2024, count: 25 }],
            orders_by_month: vec![MonthCount {
                year: 2024,
                month: 2,
                label: "2024-02".to_string(),
                count: 15,
            }],
            orders_by_type: vec![TypeCount {
                label: "Carton".to_string(),
                count: 20,
            }],
            available_years: vec![2024, 2023],
            filter: ActiveFilter::default(),
        }
    }

    #[test]
    fn dashboard_embeds_series_and_cards() {
        let html = render_dashboard(&sample_data());
        assert!(html.contains("orders-by-year"));
        assert!(html.contains("orders-by-month"));
        assert!(html.contains("orders-by-type"));
        assert!(html.contains(r#"["2024-02"]"#));
        assert!(html.contains(r#"["Carton"]"#));
        assert!(html.contains("50.0%"));
        assert!(html.contains("12.5"));
    }

    #[test]
    fn dashboard_renders_growth_sentinel() {
        let mut data = sample_data();
        data.summary.growth_percent = None;
        let html = render_dashboard(&data);
        assert!(html.contains("N/A"));
    }

    #[test]
    fn dashboard_preselects_active_year() {
        let mut data = sample_data();
        data.filter.year = Some(2023);
        let html = render_dashboard(&data);
        assert!(html.contains(r#"<option value="2023" selected>2023</option>"#));
        assert!(html.contains(r#"<option value="2024">2024</option>"#));
    }

    #[test]
    fn dashboard_prefills_date_range() {
        let mut data = sample_data();
        data.filter.date_from = NaiveDate::from_ymd_opt(2024, 1, 1);
        data.filter.date_to = NaiveDate::from_ymd_opt(2024, 6, 30);
        let html = render_dashboard(&data);
        assert!(html.contains(r#"name="date_from" value="2024-01-01""#));
        assert!(html.contains(r#"name="date_to" value="2024-06-30""#));
    }

    #[test]
    fn dashboard_escapes_hostile_type_labels() {
        let mut data = sample_data();
        data.orders_by_type = vec![TypeCount {
            label: "</script><script>alert(1)</script>".to_string(),
            count: 3,
        }];
        let html = render_dashboard(&data);
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("\\u003c/script\\u003e\\u003cscript\\u003ealert(1)"));
    }

    #[test]
    fn login_page_escapes_error_message() {
        let html = render_login(Some("<script>alert(1)</script>"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
