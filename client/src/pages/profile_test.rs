use super::*;

fn update() -> ProfileUpdate {
    ProfileUpdate { name: "Ana Lima".to_owned(), email: "ana@x.test".to_owned(), phone: None }
}

#[test]
fn submitted_fields_used_without_echo() {
    let patch = saved_patch(&update(), None);
    assert_eq!(patch.name.as_deref(), Some("Ana Lima"));
    assert_eq!(patch.email.as_deref(), Some("ana@x.test"));
    assert_eq!(patch.phone, None);
    assert_eq!(patch.age, None);
}

#[test]
fn server_echo_wins() {
    let echoed = IdentitySnapshot { name: Some("Ana L.".to_owned()), ..IdentitySnapshot::default() };
    let patch = saved_patch(&update(), Some(echoed));
    assert_eq!(patch.name.as_deref(), Some("Ana L."));
    assert_eq!(patch.email, None);
}
