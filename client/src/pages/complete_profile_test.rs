use super::*;

#[test]
fn prefill_uses_partial_profile() {
    let profile = Profile {
        id: Uuid::nil(),
        full_name: None,
        university: Some("ITB".to_owned()),
        phone_number: None,
        role: None,
    };
    assert_eq!(prefill(Some(&profile)), ProfileForm { full_name: String::new(), university: "ITB".to_owned() });
}

#[test]
fn prefill_without_profile_is_blank() {
    assert_eq!(prefill(None), ProfileForm::default());
}
