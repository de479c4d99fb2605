//! 实体别名注册器：一个 builder 实例内 实体类型 → 别名 的绑定。

use crate::error::{BuilderError, Result};
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type AliasRef = Rc<RefCell<EntityAliasRegister>>;

#[derive(Debug, Clone, Default)]
pub struct EntityAliasRegister {
    /// TypeId → (实体名, 别名)。
    bindings: HashMap<TypeId, (String, String)>,
}

impl EntityAliasRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_ref(self) -> AliasRef {
        Rc::new(RefCell::new(self))
    }

    /// 注册实体别名。
    ///
    /// 同一实体重复注册时必须给出显式别名（显式别名覆盖旧绑定）；
    /// 把一个别名绑定到第二个实体是调用方错误。
    pub fn register(
        &mut self,
        id: TypeId,
        entity: &str,
        alias: String,
        explicit: bool,
    ) -> Result<()> {
        if let Some((other_entity, _)) = self
            .bindings
            .iter()
            .find(|(other_id, (_, a))| **other_id != id && *a == alias)
            .map(|(_, b)| b)
        {
            return Err(BuilderError::DuplicateAlias {
                alias,
                entity: other_entity.clone(),
            });
        }
        if self.bindings.contains_key(&id) && !explicit {
            return Err(BuilderError::DuplicateEntity(entity.to_string()));
        }
        self.bindings.insert(id, (entity.to_string(), alias));
        Ok(())
    }

    /// 查询实体当前绑定的别名。
    pub fn alias_of(&self, id: TypeId) -> Option<String> {
        self.bindings.get(&id).map(|(_, a)| a.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;

    struct A;
    struct B;

    fn id<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn register_and_lookup() {
        let mut r = EntityAliasRegister::new();
        r.register(id::<A>(), "A", "a".into(), true).unwrap();
        assert_eq!(r.alias_of(id::<A>()), Some("a".to_string()));
        assert_eq!(r.alias_of(id::<B>()), None);
    }

    #[test]
    fn same_entity_requires_explicit_alias() {
        let mut r = EntityAliasRegister::new();
        r.register(id::<A>(), "A", "A".into(), false).unwrap();
        let err = r.register(id::<A>(), "A", "A".into(), false).unwrap_err();
        assert_eq!(err, BuilderError::DuplicateEntity("A".into()));
        // 显式别名允许重绑。
        r.register(id::<A>(), "A", "a2".into(), true).unwrap();
        assert_eq!(r.alias_of(id::<A>()), Some("a2".to_string()));
    }

    #[test]
    fn alias_collision_across_entities() {
        let mut r = EntityAliasRegister::new();
        r.register(id::<A>(), "A", "x".into(), true).unwrap();
        let err = r.register(id::<B>(), "B", "x".into(), true).unwrap_err();
        assert_eq!(
            err,
            BuilderError::DuplicateAlias {
                alias: "x".into(),
                entity: "A".into()
            }
        );
    }
}
