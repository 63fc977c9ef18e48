mod handler;

pub use handler::{
    create_person,
    create_persons,
    delete_person,
    delete_persons,
    find_all,
    find_by_country_name,
    find_by_id,
    update_person,
    update_persons,
};
