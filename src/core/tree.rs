// ============================================================================
// LocaleSync - 翻译树
// ============================================================================
//
// 文件: src/core/tree.rs
// 职责: 叶子/分支显式标记的翻译树及其遍历
// 边界:
//   - ✅ 按路径逐段查找或创建分支
//   - ✅ 叶子/分支冲突检测
//   - ✅ 前序遍历（保持插入顺序）
//   - ✅ 与 serde_json::Value 互相转换
//   - ❌ 不应包含表格行处理
//   - ❌ 不应包含文件读写
//
// ============================================================================

use serde_json::{Map, Value};

/// 翻译树节点
///
/// 叶子保存 JSON 标量（绝不是对象），分支的子节点保持插入顺序。
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationNode {
    Leaf(Value),
    Branch(Vec<(String, TranslationNode)>),
}

/// 插入叶子的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新建叶子
    Inserted,
    /// 覆盖了同一路径上已有的叶子
    ReplacedLeaf,
    /// 路径上存在叶子/分支冲突，冲突部分已被覆盖
    Conflict,
}

impl Default for TranslationNode {
    fn default() -> Self {
        TranslationNode::branch()
    }
}

impl TranslationNode {
    /// 空分支（树的根）
    pub fn branch() -> Self {
        TranslationNode::Branch(Vec::new())
    }

    /// 字符串叶子
    pub fn text<S: Into<String>>(value: S) -> Self {
        TranslationNode::Leaf(Value::String(value.into()))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TranslationNode::Leaf(_))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, TranslationNode::Branch(_))
    }

    /// 查找直接子节点
    pub fn child(&self, segment: &str) -> Option<&TranslationNode> {
        match self {
            TranslationNode::Branch(children) => children
                .iter()
                .find(|(name, _)| name == segment)
                .map(|(_, node)| node),
            TranslationNode::Leaf(_) => None,
        }
    }

    /// 按路径段查找节点
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&TranslationNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// 按路径段查找叶子值
    pub fn leaf<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        match self.get(segments) {
            Some(TranslationNode::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// 沿路径逐段查找或创建分支，并把最后一段设为叶子
    ///
    /// 路径上遇到叶子时将其替换为分支，最后一段是分支时整棵子树被叶子替换，
    /// 两种情况都返回 `InsertOutcome::Conflict`。空路径不做任何修改。
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S], value: Value) -> InsertOutcome {
        if segments.is_empty() {
            return InsertOutcome::Inserted;
        }

        let mut conflict = false;
        if self.is_leaf() {
            *self = TranslationNode::branch();
            conflict = true;
        }

        let replaced = match self {
            TranslationNode::Branch(children) => {
                insert_into(children, segments, value, &mut conflict)
            }
            TranslationNode::Leaf(_) => false,
        };

        if conflict {
            InsertOutcome::Conflict
        } else if replaced {
            InsertOutcome::ReplacedLeaf
        } else {
            InsertOutcome::Inserted
        }
    }

    /// 前序深度优先遍历所有叶子，子节点按插入顺序访问
    pub fn leaves(&self) -> Vec<(Vec<String>, &Value)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect_leaves(self, &mut path, &mut out);
        out
    }

    /// 叶子数量
    pub fn leaf_count(&self) -> usize {
        match self {
            TranslationNode::Leaf(_) => 1,
            TranslationNode::Branch(children) => {
                children.iter().map(|(_, node)| node.leaf_count()).sum()
            }
        }
    }

    /// 从 JSON 值构建（对象变为分支，其余变为叶子）
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => TranslationNode::Branch(
                map.into_iter()
                    .map(|(key, value)| (key, TranslationNode::from_json(value)))
                    .collect(),
            ),
            other => TranslationNode::Leaf(other),
        }
    }

    /// 转换为 JSON 值，对象键顺序与插入顺序一致
    pub fn to_json(&self) -> Value {
        match self {
            TranslationNode::Leaf(value) => value.clone(),
            TranslationNode::Branch(children) => {
                let mut map = Map::new();
                for (key, node) in children {
                    map.insert(key.clone(), node.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// 返回是否覆盖了已有叶子
fn insert_into<S: AsRef<str>>(
    children: &mut Vec<(String, TranslationNode)>,
    segments: &[S],
    value: Value,
    conflict: &mut bool,
) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let segment = first.as_ref();
    let position = children.iter().position(|(name, _)| name == segment);

    if rest.is_empty() {
        return match position {
            Some(idx) => {
                let slot = &mut children[idx].1;
                let replaced = slot.is_leaf();
                if !replaced {
                    *conflict = true;
                }
                *slot = TranslationNode::Leaf(value);
                replaced
            }
            None => {
                children.push((segment.to_string(), TranslationNode::Leaf(value)));
                false
            }
        };
    }

    let idx = match position {
        Some(idx) => idx,
        None => {
            children.push((segment.to_string(), TranslationNode::branch()));
            children.len() - 1
        }
    };

    let node = &mut children[idx].1;
    match node {
        TranslationNode::Branch(grandchildren) => insert_into(grandchildren, rest, value, conflict),
        TranslationNode::Leaf(_) => {
            *conflict = true;
            let mut grandchildren = Vec::new();
            let replaced = insert_into(&mut grandchildren, rest, value, conflict);
            *node = TranslationNode::Branch(grandchildren);
            replaced
        }
    }
}

fn collect_leaves<'a>(
    node: &'a TranslationNode,
    path: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a Value)>,
) {
    match node {
        TranslationNode::Leaf(value) => out.push((path.clone(), value)),
        TranslationNode::Branch(children) => {
            for (name, child) in children {
                path.push(name.clone());
                collect_leaves(child, path, out);
                path.pop();
            }
        }
    }
}
