use sea_orm::DatabaseConnection;

use crate::static_service::DATABASE_CONNECTION;

pub mod comment_repository;
pub mod department_repository;
pub mod interaction_result;
pub mod material_repository;
pub mod post_comment_repository;
pub mod post_repository;
pub mod profile_repository;
pub mod query_helpers;
pub mod rating_repository;
pub mod saved_material_repository;
pub mod study_group_repository;
pub mod subject_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use comment_repository::CommentRepository;
pub use department_repository::{DepartmentRepository, DepartmentUpdate};
pub use interaction_result::{JoinResult, RatingResult, SaveToggleResult, VoteDirection};
pub use material_repository::{MaterialFilter, MaterialRepository, MaterialUpdate, NewMaterial};
pub use post_comment_repository::PostCommentRepository;
pub use post_repository::{NewPost, PostFilter, PostRepository};
pub use profile_repository::{ProfileRepository, ProfileUpdate};
pub use rating_repository::RatingRepository;
pub use saved_material_repository::SavedMaterialRepository;
pub use study_group_repository::{NewStudyGroup, StudyGroupRepository};
pub use subject_repository::{NewSubject, SubjectRepository};
pub use user_repository::{NewUser, UserRepository};

fn shared_connection() -> &'static DatabaseConnection {
    DATABASE_CONNECTION
        .get()
        .expect("DATABASE_CONNECTION not set")
}
