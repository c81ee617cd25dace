//! The HTML shell served at the root path.
//!
//! The page is static: inline JavaScript fills it in by calling the JSON API.
//! The API routes are passed to the script through `data-*` attributes on the
//! body.

use axum::response::{Html, IntoResponse};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::endpoints::{self, format_endpoint};

const STYLE: &str = r#"
    body {
        font-family: system-ui, sans-serif;
        margin: 0 auto;
        max-width: 960px;
        padding: 1rem;
        background: #f9fafb;
        color: #111827;
    }

    .cards {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
        gap: 1rem;
    }

    .card {
        background: white;
        border: 1px solid #e5e7eb;
        border-radius: 0.5rem;
        padding: 1rem;
    }

    .card .label {
        font-size: 0.8rem;
        color: #6b7280;
        text-transform: uppercase;
    }

    .card .value {
        font-size: 1.4rem;
        font-weight: 600;
    }

    .status-Rich { color: #15803d; }
    .status-Neutral { color: #b45309; }
    .status-Poor { color: #b91c1c; }

    table {
        width: 100%;
        border-collapse: collapse;
    }

    th, td {
        text-align: left;
        padding: 0.5rem;
        border-bottom: 1px solid #e5e7eb;
    }

    form {
        display: flex;
        flex-wrap: wrap;
        gap: 0.5rem;
        align-items: end;
    }

    #error {
        color: #b91c1c;
    }
"#;

const SCRIPT: &str = r#"
    const routes = document.body.dataset;

    const money = (value) =>
        value.toLocaleString(undefined, { minimumFractionDigits: 2, maximumFractionDigits: 2 });

    function showError(message) {
        document.getElementById("error").textContent = message;
    }

    async function request(url, options) {
        const response = await fetch(url, options);

        if (!response.ok) {
            const body = await response.json().catch(() => ({}));
            throw new Error(body.detail ?? response.statusText);
        }

        return response.json();
    }

    async function loadDashboard() {
        const stats = await request(routes.dashboard);
        await loadExpenses(stats.month, stats.year);

        document.getElementById("current-month").textContent = stats.current_month;
        document.getElementById("monthly-salary").textContent = money(stats.monthly_salary);
        document.getElementById("total-expenses").textContent = money(stats.total_expenses);
        document.getElementById("remaining-balance").textContent = money(stats.remaining_balance);
        document.getElementById("net-worth").textContent = money(stats.net_worth);

        const rate = document.getElementById("savings-rate");
        rate.textContent = `${stats.savings_rate}% (${stats.status})`;
        rate.className = `value status-${stats.status}`;
    }

    async function loadCategories() {
        const categories = await request(routes.categories);
        const select = document.getElementById("expense-category");
        select.replaceChildren();

        for (const category of categories) {
            select.add(new Option(category.name, category.id));
        }
    }

    async function loadExpenses(month, year) {
        const params = new URLSearchParams({ month, year });
        const expenses = await request(`${routes.expenses}?${params}`);
        const rows = document.getElementById("expense-rows");
        rows.replaceChildren();

        for (const expense of expenses) {
            const row = rows.insertRow();
            row.insertCell().textContent = expense.date;
            row.insertCell().textContent = expense.category_name ?? "Unknown";
            row.insertCell().textContent = money(expense.amount);
            row.insertCell().textContent = expense.is_fixed ? "Fixed" : "";
            row.insertCell().textContent = expense.notes ?? "";

            const remove = document.createElement("button");
            remove.textContent = "Delete";
            remove.addEventListener("click", () => deleteExpense(expense.id));
            row.insertCell().append(remove);
        }
    }

    async function loadSuggestions() {
        const suggestions = await request(routes.fixedExpenseSuggestions);
        const list = document.getElementById("fixed-expenses");
        list.replaceChildren();

        for (const suggestion of suggestions) {
            const item = document.createElement("li");
            const logged = suggestion.already_logged ? " (logged)" : "";
            item.textContent = `${suggestion.category_name}: ${money(suggestion.suggested_amount)}${logged}`;
            list.append(item);
        }
    }

    async function refresh() {
        try {
            await Promise.all([loadDashboard(), loadSuggestions()]);
            showError("");
        } catch (error) {
            showError(error.message);
        }
    }

    async function deleteExpense(id) {
        try {
            await request(`${routes.expensePrefix}${id}`, { method: "DELETE" });
            await refresh();
        } catch (error) {
            showError(error.message);
        }
    }

    document.getElementById("expense-form").addEventListener("submit", async (event) => {
        event.preventDefault();
        const form = event.target;
        const expense = {
            date: form.date.value,
            amount: Number(form.amount.value),
            category_id: Number(form.category_id.value),
            is_fixed: form.is_fixed.checked,
            notes: form.notes.value || null,
        };

        try {
            await request(routes.expenses, {
                method: "POST",
                headers: { "Content-Type": "application/json" },
                body: JSON.stringify(expense),
            });
            form.reset();
            form.date.valueAsDate = new Date();
            await refresh();
        } catch (error) {
            showError(error.message);
        }
    });

    document.getElementById("apply-fixed").addEventListener("click", async () => {
        try {
            const result = await request(routes.applyFixedExpenses, { method: "POST" });
            document.getElementById("apply-result").textContent = result.message;
            await refresh();
        } catch (error) {
            showError(error.message);
        }
    });

    document.getElementById("expense-form").date.valueAsDate = new Date();
    loadCategories().catch((error) => showError(error.message));
    refresh();
"#;

fn summary_card(id: &str, label: &str) -> Markup {
    html! {
        div class="card"
        {
            div class="label" { (label) }
            div id=(id) class="value" { "-" }
        }
    }
}

/// Render the HTML document for the single-page UI.
pub fn shell_view() -> Markup {
    let expense_prefix = format_endpoint(endpoints::EXPENSE, "");

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Finance Tracker" }
                style { (PreEscaped(STYLE)) }
            }

            body
                data-dashboard=(endpoints::DASHBOARD)
                data-categories=(endpoints::CATEGORIES)
                data-expenses=(endpoints::EXPENSES)
                data-expense-prefix=(expense_prefix)
                data-fixed-expense-suggestions=(endpoints::FIXED_EXPENSE_SUGGESTIONS)
                data-apply-fixed-expenses=(endpoints::APPLY_FIXED_EXPENSES)
            {
                header
                {
                    h1 { "Finance Tracker" }
                    p { "Dashboard for " span id="current-month" { "this month" } }
                }

                p id="error" role="alert" {}

                section id="dashboard" class="cards"
                {
                    (summary_card("monthly-salary", "Monthly salary"))
                    (summary_card("total-expenses", "Spent this month"))
                    (summary_card("remaining-balance", "Remaining"))
                    (summary_card("savings-rate", "Savings rate"))
                    (summary_card("net-worth", "Net worth"))
                }

                section id="fixed"
                {
                    h2 { "Fixed expenses" }
                    ul id="fixed-expenses" {}
                    button id="apply-fixed" type="button" { "Apply fixed expenses" }
                    span id="apply-result" {}
                }

                section id="expenses"
                {
                    h2 { "Expenses" }

                    form id="expense-form"
                    {
                        label { "Date" input name="date" type="date" required; }
                        label { "Amount" input name="amount" type="number" step="0.01" required; }
                        label {
                            "Category"
                            select id="expense-category" name="category_id" required {}
                        }
                        label { input name="is_fixed" type="checkbox"; "Fixed" }
                        label { "Notes" input name="notes" type="text"; }
                        button type="submit" { "Add expense" }
                    }

                    table
                    {
                        thead
                        {
                            tr
                            {
                                th { "Date" }
                                th { "Category" }
                                th { "Amount" }
                                th { "Type" }
                                th { "Notes" }
                                th {}
                            }
                        }
                        tbody id="expense-rows" {}
                    }

                    a id="export" href=(endpoints::EXPORT) download { "Export to CSV" }
                }

                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

/// A route handler for the HTML shell.
pub async fn get_shell() -> impl IntoResponse {
    Html(shell_view().into_string())
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        test_utils::{assert_content_type, assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{SCRIPT, get_shell};

    async fn render_shell() -> Html {
        let response = get_shell().await.into_response();
        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        document
    }

    #[tokio::test]
    async fn shell_has_dashboard_form_and_export_link() {
        let document = render_shell().await;

        for id in ["#dashboard", "#expense-form", "#expense-rows", "#apply-fixed"] {
            let selector = Selector::parse(id).unwrap();
            assert_eq!(
                document.select(&selector).count(),
                1,
                "want one element matching {id}"
            );
        }

        let export_selector = Selector::parse("a#export").unwrap();
        let export_link = document.select(&export_selector).next().unwrap();
        assert_eq!(export_link.value().attr("href"), Some(endpoints::EXPORT));
    }

    #[tokio::test]
    async fn shell_passes_api_routes_to_script() {
        let document = render_shell().await;

        let body_selector = Selector::parse("body").unwrap();
        let body = document.select(&body_selector).next().unwrap();

        assert_eq!(body.value().attr("data-dashboard"), Some(endpoints::DASHBOARD));
        assert_eq!(body.value().attr("data-expenses"), Some(endpoints::EXPENSES));
        assert_eq!(
            body.value().attr("data-expense-prefix"),
            Some("/api/expenses/")
        );
    }

    #[test]
    fn script_lists_expenses_for_the_dashboard_month() {
        assert!(SCRIPT.contains("loadExpenses(stats.month, stats.year)"));
        assert!(!SCRIPT.contains("getMonth()"));
    }

    #[test]
    fn script_checks_status_before_parsing_body() {
        let ok_check = SCRIPT.find("if (!response.ok)").unwrap();
        let parse = SCRIPT.find("response.json()").unwrap();

        assert!(ok_check < parse);
    }
}
