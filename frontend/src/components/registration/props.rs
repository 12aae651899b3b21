use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct RegistrationProps {
    /// Id of the form to load from `/api/forms/public/{form_id}`.
    pub form_id: String,
}
