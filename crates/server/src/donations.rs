//! Donation API endpoints

use api_types::donation::{
    DonationNew, DonationOwnerView, DonationView, DonationsResponse, OwnDonationsResponse,
};
use axum::{Extension, Json, extract::State};
use engine::{Donation, users};

use crate::{ServerError, projects::require_superuser, server::ServerState};

fn view(donation: Donation) -> DonationView {
    DonationView {
        id: donation.id,
        user_id: donation.user_id,
        comment: donation.comment,
        target_amount: donation.funding.target_amount,
        allocated_amount: donation.funding.allocated_amount,
        fully_funded: donation.funding.fully_funded,
        opened_at: donation.funding.opened_at,
        closed_at: donation.funding.closed_at,
    }
}

fn owner_view(donation: Donation) -> DonationOwnerView {
    DonationOwnerView {
        id: donation.id,
        target_amount: donation.funding.target_amount,
        comment: donation.comment,
        opened_at: donation.funding.opened_at,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<Json<DonationOwnerView>, ServerError> {
    let donation = state
        .engine
        .create_donation(&user.username, payload.target_amount, payload.comment.as_deref())
        .await?;

    Ok(Json(owner_view(donation)))
}

/// Every donation in the system, allocation bookkeeping included.
pub async fn list_all(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DonationsResponse>, ServerError> {
    require_superuser(&user)?;

    let donations = state.engine.list_donations().await?;

    Ok(Json(DonationsResponse {
        donations: donations.into_iter().map(view).collect(),
    }))
}

/// The authenticated user's own donations, without bookkeeping fields.
pub async fn list_own(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<OwnDonationsResponse>, ServerError> {
    let donations = state.engine.donations_for_user(&user.username).await?;

    Ok(Json(OwnDonationsResponse {
        donations: donations.into_iter().map(owner_view).collect(),
    }))
}
