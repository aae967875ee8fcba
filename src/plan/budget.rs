use crate::model::{PageGeometry, PageRole};

pub fn footer_reserved(geometry: &PageGeometry, role: PageRole) -> f32 {
    match role {
        PageRole::Middle => geometry.footer_reserved_middle,
        PageRole::Final => geometry.footer_reserved_final,
    }
}

/// Usable content height for a page of the given role. The role-dependent
/// footer reservation is the only thing that differs between document types,
/// so this stays a lookup over configuration rather than a constant.
pub fn usable_height(geometry: &PageGeometry, role: PageRole) -> f32 {
    geometry.page_height - geometry.header_reserved - footer_reserved(geometry, role)
}
