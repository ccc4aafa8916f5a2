use actix_web::{get, web, HttpRequest, HttpResponse, Responder, Result};
use actix_web::http::StatusCode;
use tracing::{error, info, warn};

use crate::api::{ActivityQuery, GithubApiRequest};
use crate::AppState;
use crate::data::UserActivity;
use crate::endpoints::utils::IntoHttpError;

/*
Upstream failures are logged and answered with an empty leaderboard, only a
malformed query string is turned into an error status.
 */
#[get("/api/github")]
pub async fn github_activity(data: web::Data<AppState>, req: HttpRequest) -> Result<impl Responder> {
	let request = web::Query::<GithubApiRequest>::from_query(req.query_string())
		.map_error(StatusCode::BAD_REQUEST)?
		.into_inner();
	
	let query = ActivityQuery::resolve(request, &data.defaults, data.max_page_size);
	
	let events = match data.github.fetch_events(&query.owner, &query.repo, query.size).await {
		Ok(events) => events,
		Err(err) if err.is_unreachable() => {
			warn!(owner = %query.owner, repo = %query.repo, error = %err, "upstream unreachable, returning no activity");
			Vec::new()
		}
		Err(err) => {
			error!(owner = %query.owner, repo = %query.repo, error = %err, "upstream failed, returning no activity");
			Vec::new()
		}
	};
	
	let activity = UserActivity::from_events(&events);
	if activity.is_empty() {
		info!(owner = %query.owner, repo = %query.repo, "no recent activity");
	} else {
		info!(
			owner = %query.owner,
			repo = %query.repo,
			size = query.size,
			sort = %query.sort,
			events = activity.total(),
			users = activity.len(),
			"aggregated repository activity"
		);
	}
	let users = activity.ranked_by(&query.sort);
	
	Ok(HttpResponse::Ok().json(users))
}
