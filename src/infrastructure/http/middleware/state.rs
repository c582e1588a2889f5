use crate::application::services::EnquiryService;

#[derive(Clone)]
pub struct AppState {
    pub enquiry_service: EnquiryService,
}
