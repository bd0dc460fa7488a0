//! Card identifiers
//!
//! The fixed set of dashboard cards, modeled as an exhaustive enum so the
//! id -> aggregation mapping lives in one `match` and adding a card is a
//! single variant addition.

use crate::error::{AnalyticsError, Result};

/// One named metric widget on a customer dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    /// Running total of devices purchased
    BoxesPurchasedCumulative30d,
    /// Running total of devices provisioned
    BoxesProvisionedCumulative30d,
    /// Provisioned as a percentage of purchased, per day
    BoxesProvisionedPctCumulative30d,
    /// Running total of registered users
    UsersRegisteredCumulative30d,
    /// Calls in the trailing 7 days, sampled daily
    CallsCount7dWindow30d,
    /// Dial-in sessions in the trailing 7 days, sampled daily
    DialinCount7dWindow30d,
    /// Support tickets in the trailing 7 days, sampled daily
    SupportTickets7dWindow30d,
    /// Distinct active users in the trailing 7 days, sampled daily
    UsersActive7dWindow30d,
    /// Average rating over the trailing 7 days, sampled daily
    RatingsAverage7dWindow30d,
    /// Calls by type / participants / OS over the most recent 7 days
    CallsBreakdown7d,
    /// Latest comments from the most recent 7 days
    CommentsRecent7d,
}

impl Card {
    /// Every card, in dashboard order
    pub const ALL: [Card; 11] = [
        Card::BoxesPurchasedCumulative30d,
        Card::BoxesProvisionedPctCumulative30d,
        Card::CallsBreakdown7d,
        Card::RatingsAverage7dWindow30d,
        Card::BoxesProvisionedCumulative30d,
        Card::UsersActive7dWindow30d,
        Card::DialinCount7dWindow30d,
        Card::UsersRegisteredCumulative30d,
        Card::CallsCount7dWindow30d,
        Card::SupportTickets7dWindow30d,
        Card::CommentsRecent7d,
    ];

    /// Parse a card id; unknown ids are the caller's error to surface
    pub fn parse(id: &str) -> Result<Self> {
        match id {
            "boxes_purchased_cumulative_30d" => Ok(Self::BoxesPurchasedCumulative30d),
            "boxes_provisioned_cumulative_30d" => Ok(Self::BoxesProvisionedCumulative30d),
            "boxes_provisioned_pct_cumulative_30d" => Ok(Self::BoxesProvisionedPctCumulative30d),
            "users_registered_cumulative_30d" => Ok(Self::UsersRegisteredCumulative30d),
            "calls_count_7d_window_30d" => Ok(Self::CallsCount7dWindow30d),
            "dialin_count_7d_window_30d" => Ok(Self::DialinCount7dWindow30d),
            "support_tickets_7d_window_30d" => Ok(Self::SupportTickets7dWindow30d),
            "users_active_7d_window_30d" => Ok(Self::UsersActive7dWindow30d),
            "ratings_average_7d_window_30d" => Ok(Self::RatingsAverage7dWindow30d),
            "calls_breakdown_7d" => Ok(Self::CallsBreakdown7d),
            "comments_recent_7d" => Ok(Self::CommentsRecent7d),
            _ => Err(AnalyticsError::UnknownCard(id.to_string())),
        }
    }

    /// The card's wire id
    pub fn id(&self) -> &'static str {
        match self {
            Self::BoxesPurchasedCumulative30d => "boxes_purchased_cumulative_30d",
            Self::BoxesProvisionedCumulative30d => "boxes_provisioned_cumulative_30d",
            Self::BoxesProvisionedPctCumulative30d => "boxes_provisioned_pct_cumulative_30d",
            Self::UsersRegisteredCumulative30d => "users_registered_cumulative_30d",
            Self::CallsCount7dWindow30d => "calls_count_7d_window_30d",
            Self::DialinCount7dWindow30d => "dialin_count_7d_window_30d",
            Self::SupportTickets7dWindow30d => "support_tickets_7d_window_30d",
            Self::UsersActive7dWindow30d => "users_active_7d_window_30d",
            Self::RatingsAverage7dWindow30d => "ratings_average_7d_window_30d",
            Self::CallsBreakdown7d => "calls_breakdown_7d",
            Self::CommentsRecent7d => "comments_recent_7d",
        }
    }
}
