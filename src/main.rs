use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyflow::config::ClientConfig;
use studyflow::db;
use studyflow::due;
use studyflow::grid::WeeklyGrid;
use studyflow::models::{AssignmentFilter, AssignmentStatus};
use studyflow::remote::HttpApi;
use studyflow::services::{AssignmentService, EnrollmentService, ScheduleService};
use studyflow::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "studyflow=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::new_from_env()?;
    info!("Backend: {}", config.api_url);

    let pool = db::connect(&config.database_url).await?;
    let api = Arc::new(HttpApi::new(&config)?);
    let mut state = AppState::new(api.clone(), pool);

    let Some(session) = state.restore_session().await? else {
        info!("Not signed in. Log in with your @uottawa.ca account to see your dashboard.");
        return Ok(());
    };
    info!("Welcome back, {}", session.user.first_name());

    let enrolled = EnrollmentService::new(&mut state).load().await;
    match enrolled {
        Ok(courses) => {
            if courses.is_local() {
                warn!("Showing saved courses; the backend is unreachable");
            }
            for course in &courses.value {
                info!("{} {} ({})", course.code, course.title, course.color.as_str());
            }
        }
        Err(e) => warn!("Could not load courses: {}", e),
    }
    if !state.is_authenticated() {
        return Ok(());
    }

    let assignments = AssignmentService::new(api.clone());
    let filter = AssignmentFilter {
        status: Some(AssignmentStatus::Todo),
        ..Default::default()
    };
    let result = assignments.list(&filter).await;
    match state.settle(result).await {
        Ok(list) => {
            let now = due::now();
            for a in &list {
                if let Some(status) = a.due_status(now) {
                    info!("[{}] {} - {}", a.course_code, a.title, status);
                }
            }
        }
        Err(e) => warn!("Could not load assignments: {}", e),
    }

    let result = assignments.stats().await;
    if let Ok(stats) = state.settle(result).await {
        info!(
            "{} assignments, {}% complete, {} overdue",
            stats.total,
            stats.completion_rate(),
            stats.overdue
        );
    }

    let schedule = ScheduleService::new(api);
    let result = schedule.load().await;
    match state.settle(result).await {
        Ok(overview) => {
            let grid = WeeklyGrid::build(&overview.schedule);
            info!(
                "{} classes this week, {:.1} hours",
                grid.block_count(),
                overview.schedule.total_hours_per_week
            );
            for conflict in &overview.conflicts {
                warn!(
                    "Conflict on {}: {} and {}",
                    conflict.day, conflict.course1, conflict.course2
                );
            }
        }
        Err(e) => warn!("Could not load schedule: {}", e),
    }

    Ok(())
}
