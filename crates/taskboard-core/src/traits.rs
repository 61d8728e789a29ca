/// An edit buffer copied out of an entity and written back on explicit save.
///
/// The buffer is owned by the editor; the entity is not touched until
/// `apply_to` is called.
pub trait Editable<T>: Sized {
    fn from_entity(entity: &T) -> Self;
    fn apply_to(self, entity: &mut T);
}
