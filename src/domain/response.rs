use chrono::{DateTime, FixedOffset};

use crate::domain::value::{
    Direction, Message, MessageStatus, PhoneNumber, PhoneNumberRegistrationStatus, Sid,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// State of a message as reported by the SMS API, either directly after
/// sending or from a later status query.
///
/// `status` and `direction` are `None` when the API reports a label this
/// crate does not know; the response is still usable.
pub struct MessageResponse {
    /// Identifier of the message on the API.
    pub sid: Sid,
    /// When the message resource was created.
    pub date_created: DateTime<FixedOffset>,
    /// When the message resource was last updated.
    pub date_updated: DateTime<FixedOffset>,
    /// Delivery status, if the reported label is known.
    pub status: Option<MessageStatus>,
    /// The message as echoed back by the API.
    pub message: Message,
    /// Resource path of this message relative to the API host.
    pub uri: String,
    /// Direction of the message, if the reported label is known.
    pub direction: Option<Direction>,
    /// Version of the API that handled the request.
    pub api_version: String,
    /// Number of SMS the API split the body into.
    pub num_segments: u32,
}

/// Service path prefix of the SMS API on the portal dashboard.
const SMS_SERVICE_PREFIX: &str = "/service/sms/";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A phone number registered on the portal dashboard for use with one of
/// its APIs, e.g. as the sender line of an SMS.
///
/// `status` is `None` when the dashboard reports a label this crate does
/// not know; such a number never counts as a usable sender.
pub struct RegisteredPhoneNumber {
    /// Identifier of the registration on the dashboard.
    pub id: String,
    /// The registered number.
    pub number: PhoneNumber,
    /// Verification status of the registration, if the reported label is
    /// known.
    pub status: Option<PhoneNumberRegistrationStatus>,
    /// Service path of the API the number is registered for.
    pub service_id: String,
}

impl RegisteredPhoneNumber {
    /// Whether this number can be used as the sender of an SMS: verified
    /// and registered for the SMS service.
    pub fn is_verified_sms_sender(&self) -> bool {
        self.status == Some(PhoneNumberRegistrationStatus::Verified)
            && self.service_id.starts_with(SMS_SERVICE_PREFIX)
    }
}
