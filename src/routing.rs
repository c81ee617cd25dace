//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    category::{create_category_endpoint, delete_category_endpoint, get_categories_endpoint},
    config::{
        get_all_config_endpoint, get_config_endpoint, update_config_endpoint,
        upsert_config_endpoint,
    },
    dashboard::get_dashboard_endpoint,
    debt::{create_debt_endpoint, delete_debt_endpoint, get_debts_endpoint, update_debt_endpoint},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        get_expenses_endpoint, update_expense_endpoint,
    },
    export::export_expenses_endpoint,
    fixed_expense::{apply_fixed_expenses_endpoint, get_fixed_expense_suggestions_endpoint},
    investment::{
        create_investment_endpoint, delete_investment_endpoint, get_investments_endpoint,
        update_investment_endpoint,
    },
    report::get_monthly_reports_endpoint,
    shell::get_shell,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::CONFIG,
            get(get_all_config_endpoint).put(upsert_config_endpoint),
        )
        .route(
            endpoints::CONFIG_ENTRY,
            get(get_config_endpoint).put(update_config_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::INVESTMENTS,
            get(get_investments_endpoint).post(create_investment_endpoint),
        )
        .route(
            endpoints::INVESTMENT,
            put(update_investment_endpoint).delete(delete_investment_endpoint),
        )
        .route(
            endpoints::DEBTS,
            get(get_debts_endpoint).post(create_debt_endpoint),
        )
        .route(
            endpoints::DEBT,
            put(update_debt_endpoint).delete(delete_debt_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(
            endpoints::FIXED_EXPENSE_SUGGESTIONS,
            get(get_fixed_expense_suggestions_endpoint),
        )
        .route(
            endpoints::APPLY_FIXED_EXPENSES,
            post(apply_fixed_expenses_endpoint),
        )
        .route(endpoints::MONTHLY_REPORTS, get(get_monthly_reports_endpoint))
        .route(endpoints::EXPORT, get(export_expenses_endpoint));

    Router::new()
        .route(endpoints::ROOT, get(get_shell))
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Any route that does not exist gets a JSON 404.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
